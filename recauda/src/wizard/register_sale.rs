//! Register-sale wizard: event → details.

use super::machine::WizardFlow;
use crate::backend::{Backend, BackendError, NewSale};
use crate::routes;
use crate::types::{Event, EventId};
use crate::validation::{
    Field, FieldErrors, REQUIRED, ValidationError, ValidationRules, clamp_quantity, digits_only,
    parse_quantity_input, validate_name, validate_phone,
};
use futures::TryFutureExt;
use futures::future::BoxFuture;

const EVENT_REQUIRED: &str = "Seleccione un evento";
const EVENT_NOT_ACTIVE: &str = "El evento seleccionado no está activo";

/// Everything the register-sale wizard collects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterSaleForm {
    /// Event of the sale
    pub event_id: Option<EventId>,
    /// Buyer's given name
    pub first_name: String,
    /// Buyer's family name
    pub last_name: String,
    /// Buyer's phone as typed
    pub phone: String,
    /// Numbers or portions sold
    pub quantity: u32,
    /// Already paid
    pub paid: bool,
}

impl Default for RegisterSaleForm {
    fn default() -> Self {
        Self {
            event_id: None,
            first_name: String::new(),
            last_name: String::new(),
            phone: String::new(),
            quantity: 1,
            paid: false,
        }
    }
}

/// Edits of the register-sale form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterSaleEdit {
    /// Pick the event
    SelectEvent(EventId),
    /// Buyer's given name
    FirstName(String),
    /// Buyer's family name
    LastName(String),
    /// Buyer's phone
    Phone(String),
    /// "+" button
    Increment,
    /// "−" button
    Decrement,
    /// Quantity typed
    QuantityInput(String),
    /// Paid toggle
    Paid(bool),
}

/// The register-sale wizard, offering the events active when it opened
#[derive(Debug, Clone, Default)]
pub struct RegisterSaleFlow {
    active_events: Vec<EventId>,
}

impl RegisterSaleFlow {
    /// Flow over the active events of `events`
    #[must_use]
    pub fn new(events: &[Event]) -> Self {
        Self {
            active_events: events
                .iter()
                .filter(|event| event.is_active())
                .map(|event| event.id.clone())
                .collect(),
        }
    }

    /// Events offered in the selector
    #[must_use]
    pub fn active_events(&self) -> &[EventId] {
        &self.active_events
    }
}

impl WizardFlow for RegisterSaleFlow {
    type Form = RegisterSaleForm;
    type Edit = RegisterSaleEdit;
    type Payload = NewSale;

    fn step_titles(&self) -> &'static [&'static str] {
        &["Seleccionar evento", "Datos de la venta"]
    }

    fn initial_form(&self) -> RegisterSaleForm {
        RegisterSaleForm::default()
    }

    fn apply_edit(&self, form: &mut RegisterSaleForm, edit: RegisterSaleEdit) -> Vec<Field> {
        match edit {
            RegisterSaleEdit::SelectEvent(id) => {
                form.event_id = Some(id);
                vec![Field::Event]
            },
            RegisterSaleEdit::FirstName(value) => {
                form.first_name = value;
                vec![Field::FirstName]
            },
            RegisterSaleEdit::LastName(value) => {
                form.last_name = value;
                vec![Field::LastName]
            },
            RegisterSaleEdit::Phone(value) => {
                form.phone = value;
                vec![Field::Phone]
            },
            RegisterSaleEdit::Increment => {
                form.quantity = clamp_quantity(form.quantity.saturating_add(1));
                vec![Field::Quantity]
            },
            RegisterSaleEdit::Decrement => {
                form.quantity = clamp_quantity(form.quantity.saturating_sub(1));
                vec![Field::Quantity]
            },
            RegisterSaleEdit::QuantityInput(input) => {
                form.quantity = parse_quantity_input(&input, form.quantity);
                vec![Field::Quantity]
            },
            RegisterSaleEdit::Paid(paid) => {
                form.paid = paid;
                Vec::new()
            },
        }
    }

    fn blur_quantity(&self, form: &mut RegisterSaleForm) {
        form.quantity = clamp_quantity(form.quantity);
    }

    fn validate(&self, step: usize, form: &RegisterSaleForm, rules: &ValidationRules) -> FieldErrors {
        let mut errors = FieldErrors::new();
        match step {
            1 => match &form.event_id {
                None => errors.insert(Field::Event, ValidationError::Required(EVENT_REQUIRED)),
                Some(id) if !self.active_events.contains(id) => {
                    errors.insert(Field::Event, ValidationError::Invalid(EVENT_NOT_ACTIVE));
                },
                Some(_) => {},
            },
            2 => {
                errors.check(Field::FirstName, validate_name(&form.first_name, rules, REQUIRED));
                errors.check(Field::LastName, validate_name(&form.last_name, rules, REQUIRED));
                errors.check(Field::Phone, validate_phone(&form.phone, rules, REQUIRED));
            },
            _ => {},
        }
        errors
    }

    fn commit(&self, step: usize, form: &RegisterSaleForm, draft: &mut RegisterSaleForm) {
        match step {
            1 => draft.event_id.clone_from(&form.event_id),
            2 => {
                let event_id = draft.event_id.take();
                *draft = form.clone();
                draft.event_id = event_id;
                draft.quantity = clamp_quantity(draft.quantity);
            },
            _ => {},
        }
    }

    fn payload(&self, draft: &RegisterSaleForm) -> Option<NewSale> {
        Some(NewSale {
            event_id: draft.event_id.clone()?,
            first_name: draft.first_name.trim().to_string(),
            last_name: draft.last_name.trim().to_string(),
            phone: digits_only(&draft.phone),
            quantity: clamp_quantity(draft.quantity),
            paid: draft.paid,
        })
    }

    fn submit(&self, backend: &dyn Backend, payload: NewSale) -> BoxFuture<'static, Result<String, BackendError>> {
        Box::pin(backend.register_sale(payload).map_ok(|id| id.to_string()))
    }

    fn finish_route(&self) -> &'static str {
        routes::BUYERS_LIST
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EventStatus, EventType};
    use chrono::NaiveDate;

    fn events() -> Vec<Event> {
        let event = |id: &str, status| Event {
            id: EventId::new(id),
            name: format!("Evento {id}"),
            event_type: EventType::Raffle,
            status,
            end_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap_or_default(),
            total_numbers: 100,
            sold_numbers: 0,
        };
        vec![event("1", EventStatus::Active), event("2", EventStatus::Completed)]
    }

    #[test]
    fn only_active_events_are_offered() {
        let flow = RegisterSaleFlow::new(&events());
        assert_eq!(flow.active_events(), &[EventId::new("1")]);
        assert_eq!(flow.total_steps(), 2);
    }

    #[test]
    fn event_step_rejects_missing_or_inactive_event() {
        let flow = RegisterSaleFlow::new(&events());
        let rules = ValidationRules::default();
        let mut form = RegisterSaleForm::default();

        assert_eq!(
            flow.validate(1, &form, &rules).get(Field::Event),
            Some(&ValidationError::Required(EVENT_REQUIRED))
        );

        let _ = flow.apply_edit(&mut form, RegisterSaleEdit::SelectEvent(EventId::new("2")));
        assert_eq!(
            flow.validate(1, &form, &rules).get(Field::Event),
            Some(&ValidationError::Invalid(EVENT_NOT_ACTIVE))
        );

        let _ = flow.apply_edit(&mut form, RegisterSaleEdit::SelectEvent(EventId::new("1")));
        assert!(flow.validate(1, &form, &rules).is_empty());
    }

    #[test]
    fn details_step_uses_shared_rules() {
        let flow = RegisterSaleFlow::new(&events());
        let form = RegisterSaleForm {
            first_name: "A".into(),
            last_name: "Paz".into(),
            phone: "1234".into(),
            ..RegisterSaleForm::default()
        };
        let errors = flow.validate(2, &form, &ValidationRules::default());
        assert_eq!(errors.message(Field::FirstName).as_deref(), Some("Debe tener al menos 2 caracteres"));
        assert_eq!(errors.message(Field::Phone).as_deref(), Some("Debe tener al menos 8 dígitos"));
        assert!(errors.get(Field::LastName).is_none());
    }

    #[test]
    fn payload_carries_event_and_clamped_quantity() {
        let flow = RegisterSaleFlow::new(&events());
        let draft = RegisterSaleForm {
            event_id: Some(EventId::new("1")),
            first_name: "Ana".into(),
            last_name: "Paz".into(),
            phone: "358 412 3456".into(),
            quantity: 0,
            paid: true,
        };
        let sale = flow.payload(&draft);
        assert_eq!(sale.as_ref().map(|s| (s.quantity, s.phone.as_str())), Some((1, "3584123456")));
    }
}

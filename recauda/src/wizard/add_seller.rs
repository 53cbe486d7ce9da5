//! Add-seller wizard: data → assign numbers → confirm.
//!
//! The number-assignment step is also used by the event detail's
//! assign-numbers modal, so it lives in its own [`AssignmentForm`].

use super::machine::WizardFlow;
use crate::backend::{Backend, BackendError, NewSeller, NumberAssignment};
use crate::routes;
use crate::validation::{
    Field, FieldErrors, ValidationError, ValidationRules, clamp_quantity, digits_only,
    parse_quantity_input, require, validate_name, validate_phone,
};
use futures::TryFutureExt;
use futures::future::BoxFuture;

pub(crate) const FIRST_NAME_REQUIRED: &str = "El nombre es requerido";
pub(crate) const LAST_NAME_REQUIRED: &str = "El apellido es requerido";
pub(crate) const PHONE_REQUIRED: &str = "El teléfono es requerido";
const FROM_REQUIRED: &str = "El número inicial es requerido";
const TO_REQUIRED: &str = "El número final es requerido";
const INVALID_NUMBER: &str = "Ingrese un número válido";
const INVALID_RANGE: &str = "El número final debe ser mayor o igual al inicial";

/// Default quantity handed to a new seller
pub const DEFAULT_QUANTITY: u32 = 10;

/// Quantity and numbering of an assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentForm {
    /// Numbers to hand out; zero only while the input is being retyped
    pub quantity: u32,
    /// Let the system pick the numbers
    pub auto_assign: bool,
    /// First number of a manual range, as typed
    pub from_number: String,
    /// Last number of a manual range, as typed
    pub to_number: String,
}

impl Default for AssignmentForm {
    fn default() -> Self {
        Self {
            quantity: DEFAULT_QUANTITY,
            auto_assign: true,
            from_number: String::new(),
            to_number: String::new(),
        }
    }
}

/// Edits of an [`AssignmentForm`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentEdit {
    /// "+" button
    Increment,
    /// "−" button
    Decrement,
    /// Quantity typed
    QuantityInput(String),
    /// Toggle automatic numbering
    AutoAssign(bool),
    /// First number typed
    FromNumber(String),
    /// Last number typed
    ToNumber(String),
}

fn parse_number(value: &str, required: &'static str) -> Result<u32, ValidationError> {
    require(value, required)?;
    value
        .trim()
        .parse()
        .map_err(|_| ValidationError::Invalid(INVALID_NUMBER))
}

impl AssignmentForm {
    /// Apply an edit; returns the field whose error it invalidates
    pub fn apply(&mut self, edit: AssignmentEdit) -> Option<Field> {
        match edit {
            AssignmentEdit::Increment => {
                self.quantity = clamp_quantity(self.quantity.saturating_add(1));
                Some(Field::Quantity)
            },
            AssignmentEdit::Decrement => {
                self.quantity = clamp_quantity(self.quantity.saturating_sub(1));
                Some(Field::Quantity)
            },
            AssignmentEdit::QuantityInput(input) => {
                self.quantity = parse_quantity_input(&input, self.quantity);
                Some(Field::Quantity)
            },
            AssignmentEdit::AutoAssign(on) => {
                self.auto_assign = on;
                None
            },
            AssignmentEdit::FromNumber(value) => {
                self.from_number = value;
                Some(Field::FromNumber)
            },
            AssignmentEdit::ToNumber(value) => {
                self.to_number = value;
                Some(Field::ToNumber)
            },
        }
    }

    /// Quantity input lost focus: an emptied field becomes 1
    pub fn blur(&mut self) {
        self.quantity = clamp_quantity(self.quantity);
    }

    /// Manual ranges need both ends, in order
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.auto_assign {
            return errors;
        }
        let from = parse_number(&self.from_number, FROM_REQUIRED);
        let to = parse_number(&self.to_number, TO_REQUIRED);
        if let (Ok(from), Ok(to)) = (&from, &to) {
            if to < from {
                errors.insert(Field::ToNumber, ValidationError::Invalid(INVALID_RANGE));
            }
        }
        errors.check(Field::FromNumber, from.map(|_| ()));
        errors.check(Field::ToNumber, to.map(|_| ()));
        errors
    }

    /// Typed numbering of a valid form
    #[must_use]
    pub fn assignment(&self) -> Option<NumberAssignment> {
        if self.auto_assign {
            return Some(NumberAssignment::Automatic);
        }
        let from = self.from_number.trim().parse().ok()?;
        let to = self.to_number.trim().parse().ok()?;
        Some(NumberAssignment::Manual { from, to })
    }

    /// Quantity as submitted
    #[must_use]
    pub fn effective_quantity(&self) -> u32 {
        clamp_quantity(self.quantity)
    }
}

/// Everything the add-seller wizard collects
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddSellerForm {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Phone as typed
    pub phone: String,
    /// Number assignment
    pub assignment: AssignmentForm,
}

/// Edits of the add-seller form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddSellerEdit {
    /// Given name
    FirstName(String),
    /// Family name
    LastName(String),
    /// Phone
    Phone(String),
    /// Assignment step
    Assignment(AssignmentEdit),
}

/// The add-seller wizard
#[derive(Debug, Clone, Copy, Default)]
pub struct AddSellerFlow;

impl WizardFlow for AddSellerFlow {
    type Form = AddSellerForm;
    type Edit = AddSellerEdit;
    type Payload = NewSeller;

    fn step_titles(&self) -> &'static [&'static str] {
        &["Datos del vendedor", "Asignar números", "Confirmar vendedor"]
    }

    fn initial_form(&self) -> AddSellerForm {
        AddSellerForm::default()
    }

    fn apply_edit(&self, form: &mut AddSellerForm, edit: AddSellerEdit) -> Vec<Field> {
        match edit {
            AddSellerEdit::FirstName(value) => {
                form.first_name = value;
                vec![Field::FirstName]
            },
            AddSellerEdit::LastName(value) => {
                form.last_name = value;
                vec![Field::LastName]
            },
            AddSellerEdit::Phone(value) => {
                form.phone = value;
                vec![Field::Phone]
            },
            AddSellerEdit::Assignment(edit) => form.assignment.apply(edit).into_iter().collect(),
        }
    }

    fn blur_quantity(&self, form: &mut AddSellerForm) {
        form.assignment.blur();
    }

    fn validate(&self, step: usize, form: &AddSellerForm, rules: &ValidationRules) -> FieldErrors {
        match step {
            1 => {
                let mut errors = FieldErrors::new();
                errors.check(Field::FirstName, validate_name(&form.first_name, rules, FIRST_NAME_REQUIRED));
                errors.check(Field::LastName, validate_name(&form.last_name, rules, LAST_NAME_REQUIRED));
                errors.check(Field::Phone, validate_phone(&form.phone, rules, PHONE_REQUIRED));
                errors
            },
            2 => form.assignment.validate(),
            _ => FieldErrors::new(),
        }
    }

    fn commit(&self, step: usize, form: &AddSellerForm, draft: &mut AddSellerForm) {
        match step {
            1 => {
                draft.first_name.clone_from(&form.first_name);
                draft.last_name.clone_from(&form.last_name);
                draft.phone.clone_from(&form.phone);
            },
            2 => {
                draft.assignment = form.assignment.clone();
                draft.assignment.blur();
            },
            _ => {},
        }
    }

    fn payload(&self, draft: &AddSellerForm) -> Option<NewSeller> {
        Some(NewSeller {
            first_name: draft.first_name.trim().to_string(),
            last_name: draft.last_name.trim().to_string(),
            phone: digits_only(&draft.phone),
            quantity: draft.assignment.effective_quantity(),
            assignment: draft.assignment.assignment()?,
        })
    }

    fn submit(&self, backend: &dyn Backend, payload: NewSeller) -> BoxFuture<'static, Result<String, BackendError>> {
        Box::pin(backend.create_seller(payload).map_ok(|id| id.to_string()))
    }

    fn finish_route(&self) -> &'static str {
        routes::SELLERS_LIST
    }
}

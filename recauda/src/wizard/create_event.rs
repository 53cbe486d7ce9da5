//! Create-event wizard: type → data → confirm.

use super::machine::WizardFlow;
use crate::backend::{Backend, BackendError, FoodItem, NewEvent};
use crate::routes;
use crate::types::EventType;
use crate::validation::{Field, FieldErrors, ValidationError, ValidationRules, parse_amount, require};
use chrono::NaiveDate;
use futures::TryFutureExt;
use futures::future::BoxFuture;

const NAME_REQUIRED: &str = "El nombre del evento es requerido";
const PRICE_REQUIRED: &str = "El valor del número es requerido";
const TOTAL_REQUIRED: &str = "La cantidad total de números es requerida";
const START_REQUIRED: &str = "La fecha de inicio es requerida";
const END_REQUIRED: &str = "La fecha de finalización es requerida";
const ITEM_NAME_REQUIRED: &str = "El nombre del producto es requerido";
const ITEM_PRICE_REQUIRED: &str = "El precio es requerido";
const INVALID_AMOUNT: &str = "Ingrese un valor válido";
const INVALID_COUNT: &str = "Ingrese una cantidad válida";

const ORDINAL_PRIZES: [&str; 10] = [
    "Primer premio",
    "Segundo premio",
    "Tercer premio",
    "Cuarto premio",
    "Quinto premio",
    "Sexto premio",
    "Séptimo premio",
    "Octavo premio",
    "Noveno premio",
    "Décimo premio",
];

/// Label of the prize at a zero-based index
#[must_use]
pub fn prize_label(index: usize) -> String {
    ORDINAL_PRIZES
        .get(index)
        .map_or_else(|| format!("Premio {}", index + 1), |label| (*label).to_string())
}

/// A food item as typed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FoodItemDraft {
    /// Item name
    pub name: String,
    /// Price as typed
    pub price: String,
}

/// Everything the create-event wizard collects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEventForm {
    /// Raffle or food sale
    pub event_type: EventType,
    /// Event name
    pub name: String,
    /// Price of one number, as typed
    pub number_price: String,
    /// Numbers on offer, as typed
    pub total_numbers: String,
    /// Let the total follow assignments
    pub auto_adjust: bool,
    /// Prize descriptions
    pub prizes: Vec<String>,
    /// Food items
    pub food_items: Vec<FoodItemDraft>,
    /// First selling day
    pub start_date: Option<NaiveDate>,
    /// Last selling day
    pub end_date: Option<NaiveDate>,
}

impl Default for CreateEventForm {
    fn default() -> Self {
        Self {
            event_type: EventType::Raffle,
            name: String::new(),
            number_price: String::new(),
            total_numbers: String::new(),
            auto_adjust: true,
            prizes: vec![String::new()],
            food_items: vec![FoodItemDraft::default()],
            start_date: None,
            end_date: None,
        }
    }
}

/// Edits of the create-event form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateEventEdit {
    /// Pick the event type
    SetType(EventType),
    /// Event name
    Name(String),
    /// Number price
    NumberPrice(String),
    /// Total numbers
    TotalNumbers(String),
    /// Auto-adjust toggle
    AutoAdjust(bool),
    /// Start date
    StartDate(Option<NaiveDate>),
    /// End date
    EndDate(Option<NaiveDate>),
    /// Append an empty prize
    AddPrize,
    /// Edit a prize
    Prize {
        /// Zero-based index
        index: usize,
        /// New text
        value: String,
    },
    /// Drop a prize
    RemovePrize(usize),
    /// Append an empty food item
    AddFoodItem,
    /// Edit a food item's name
    FoodItemName {
        /// Zero-based index
        index: usize,
        /// New name
        value: String,
    },
    /// Edit a food item's price
    FoodItemPrice {
        /// Zero-based index
        index: usize,
        /// New price
        value: String,
    },
    /// Drop a food item; the last one stays
    RemoveFoodItem(usize),
}

/// The create-event wizard
#[derive(Debug, Clone, Copy)]
pub struct CreateEventFlow {
    max_prizes: usize,
}

impl CreateEventFlow {
    /// Flow allowing up to `max_prizes` prizes per raffle
    #[must_use]
    pub const fn new(max_prizes: usize) -> Self {
        Self { max_prizes }
    }

    /// Prize cap
    #[must_use]
    pub const fn max_prizes(&self) -> usize {
        self.max_prizes
    }

    /// Whether another prize can be added
    #[must_use]
    pub fn can_add_prize(&self, form: &CreateEventForm) -> bool {
        form.prizes.len() < self.max_prizes
    }
}

impl Default for CreateEventFlow {
    fn default() -> Self {
        Self::new(10)
    }
}

fn food_item_fields(count: usize) -> Vec<Field> {
    (0..count)
        .flat_map(|i| [Field::FoodItemName(i), Field::FoodItemPrice(i)])
        .collect()
}

fn check_amount(value: &str, required: &'static str) -> Result<(), ValidationError> {
    require(value, required)?;
    parse_amount(value)
        .map(|_| ())
        .ok_or(ValidationError::Invalid(INVALID_AMOUNT))
}

fn parse_count(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|n| *n >= 1)
}

impl WizardFlow for CreateEventFlow {
    type Form = CreateEventForm;
    type Edit = CreateEventEdit;
    type Payload = NewEvent;

    fn step_titles(&self) -> &'static [&'static str] {
        &["Tipo de evento", "Datos generales", "Confirmar evento"]
    }

    fn initial_form(&self) -> CreateEventForm {
        CreateEventForm::default()
    }

    fn apply_edit(&self, form: &mut CreateEventForm, edit: CreateEventEdit) -> Vec<Field> {
        match edit {
            CreateEventEdit::SetType(event_type) => {
                form.event_type = event_type;
                Vec::new()
            },
            CreateEventEdit::Name(value) => {
                form.name = value;
                vec![Field::EventName]
            },
            CreateEventEdit::NumberPrice(value) => {
                form.number_price = value;
                vec![Field::NumberPrice]
            },
            CreateEventEdit::TotalNumbers(value) => {
                form.total_numbers = value;
                vec![Field::TotalNumbers]
            },
            CreateEventEdit::AutoAdjust(on) => {
                form.auto_adjust = on;
                vec![Field::TotalNumbers]
            },
            CreateEventEdit::StartDate(date) => {
                form.start_date = date;
                vec![Field::StartDate]
            },
            CreateEventEdit::EndDate(date) => {
                form.end_date = date;
                vec![Field::EndDate]
            },
            CreateEventEdit::AddPrize => {
                if self.can_add_prize(form) {
                    form.prizes.push(String::new());
                } else {
                    tracing::debug!(max = self.max_prizes, "Prize cap reached");
                }
                Vec::new()
            },
            CreateEventEdit::Prize { index, value } => {
                if let Some(prize) = form.prizes.get_mut(index) {
                    *prize = value;
                }
                Vec::new()
            },
            CreateEventEdit::RemovePrize(index) => {
                if index < form.prizes.len() {
                    form.prizes.remove(index);
                }
                Vec::new()
            },
            CreateEventEdit::AddFoodItem => {
                form.food_items.push(FoodItemDraft::default());
                Vec::new()
            },
            CreateEventEdit::FoodItemName { index, value } => {
                if let Some(item) = form.food_items.get_mut(index) {
                    item.name = value;
                }
                vec![Field::FoodItemName(index)]
            },
            CreateEventEdit::FoodItemPrice { index, value } => {
                if let Some(item) = form.food_items.get_mut(index) {
                    item.price = value;
                }
                vec![Field::FoodItemPrice(index)]
            },
            CreateEventEdit::RemoveFoodItem(index) => {
                if form.food_items.len() > 1 && index < form.food_items.len() {
                    let before = form.food_items.len();
                    form.food_items.remove(index);
                    // Indices shift, so every item error is stale
                    return food_item_fields(before);
                }
                Vec::new()
            },
        }
    }

    fn validate(&self, step: usize, form: &CreateEventForm, _rules: &ValidationRules) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if step != 2 {
            return errors;
        }

        errors.check(Field::EventName, require(&form.name, NAME_REQUIRED));
        match form.event_type {
            EventType::Raffle => {
                errors.check(Field::NumberPrice, check_amount(&form.number_price, PRICE_REQUIRED));
                if !form.auto_adjust {
                    let total = require(&form.total_numbers, TOTAL_REQUIRED).and_then(|()| {
                        parse_count(&form.total_numbers)
                            .map(|_| ())
                            .ok_or(ValidationError::Invalid(INVALID_COUNT))
                    });
                    errors.check(Field::TotalNumbers, total);
                }
            },
            EventType::FoodSale => {
                for (index, item) in form.food_items.iter().enumerate() {
                    errors.check(Field::FoodItemName(index), require(&item.name, ITEM_NAME_REQUIRED));
                    errors.check(Field::FoodItemPrice(index), check_amount(&item.price, ITEM_PRICE_REQUIRED));
                }
            },
        }
        if form.start_date.is_none() {
            errors.insert(Field::StartDate, ValidationError::Required(START_REQUIRED));
        }
        if form.end_date.is_none() {
            errors.insert(Field::EndDate, ValidationError::Required(END_REQUIRED));
        }
        errors
    }

    fn commit(&self, step: usize, form: &CreateEventForm, draft: &mut CreateEventForm) {
        match step {
            1 => draft.event_type = form.event_type,
            2 => {
                let event_type = draft.event_type;
                *draft = form.clone();
                draft.event_type = event_type;
            },
            _ => {},
        }
    }

    fn payload(&self, draft: &CreateEventForm) -> Option<NewEvent> {
        let start_date = draft.start_date?;
        let end_date = draft.end_date?;
        let name = draft.name.trim().to_string();

        let event = match draft.event_type {
            EventType::Raffle => NewEvent {
                event_type: EventType::Raffle,
                name,
                number_price: Some(parse_amount(&draft.number_price)?),
                total_numbers: if draft.auto_adjust {
                    None
                } else {
                    Some(parse_count(&draft.total_numbers)?)
                },
                auto_adjust: draft.auto_adjust,
                prizes: draft
                    .prizes
                    .iter()
                    .map(|prize| prize.trim())
                    .filter(|prize| !prize.is_empty())
                    .map(str::to_string)
                    .collect(),
                food_items: Vec::new(),
                start_date,
                end_date,
            },
            EventType::FoodSale => NewEvent {
                event_type: EventType::FoodSale,
                name,
                number_price: None,
                total_numbers: None,
                auto_adjust: false,
                prizes: Vec::new(),
                food_items: draft
                    .food_items
                    .iter()
                    .map(|item| {
                        Some(FoodItem {
                            name: item.name.trim().to_string(),
                            price: parse_amount(&item.price)?,
                        })
                    })
                    .collect::<Option<Vec<_>>>()?,
                start_date,
                end_date,
            },
        };
        Some(event)
    }

    fn submit(&self, backend: &dyn Backend, payload: NewEvent) -> BoxFuture<'static, Result<String, BackendError>> {
        Box::pin(backend.create_event(payload).map_ok(|id| id.to_string()))
    }

    fn finish_route(&self) -> &'static str {
        routes::HOME
    }
}

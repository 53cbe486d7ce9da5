//! Linear multi-step forms.
//!
//! Every wizard runs on the same [`WizardReducer`]; a [`WizardFlow`] supplies
//! the form shape, the per-step validation and the submit call.

pub mod add_seller;
pub mod create_event;
pub mod machine;
pub mod register_sale;

pub use add_seller::{AddSellerEdit, AddSellerFlow, AddSellerForm, AssignmentEdit, AssignmentForm};
pub use create_event::{CreateEventEdit, CreateEventFlow, CreateEventForm, FoodItemDraft};
pub use machine::{
    WizardAction, WizardEnvironment, WizardFlow, WizardPhase, WizardReducer, WizardState,
};
pub use register_sale::{RegisterSaleEdit, RegisterSaleFlow, RegisterSaleForm};

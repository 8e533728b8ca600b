pub mod form;
pub mod reference;
pub mod validators;

pub use form::{
    AddressForm, AddressSection, CheckoutForm, CheckoutSession, CreditCardForm, CustomerForm,
    SubmitOutcome, ValidCheckout,
};
pub use validators::{FieldError, FieldErrorKind};

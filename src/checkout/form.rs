//! Checkout form values, validation and the per-session form controller.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validators::{self, FieldError, FieldErrorKind};
use crate::{
    cart::Cart,
    models::{Address, Customer, Order, OrderItem, Purchase, State},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressForm {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    /// Country code; drives the state lookup.
    pub country: Option<String>,
    pub zip_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreditCardForm {
    pub card_type: Option<String>,
    pub name_on_card: Option<String>,
    pub card_number: Option<String>,
    pub security_code: Option<String>,
    pub expiration_month: Option<u32>,
    pub expiration_year: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutForm {
    pub customer: CustomerForm,
    pub shipping_address: AddressForm,
    pub billing_address: AddressForm,
    pub credit_card: CreditCardForm,
}

/// Every field path of the form, in display order.
pub const FIELDS: [&str; 19] = [
    "customer.firstName",
    "customer.lastName",
    "customer.email",
    "shippingAddress.street",
    "shippingAddress.city",
    "shippingAddress.state",
    "shippingAddress.country",
    "shippingAddress.zipCode",
    "billingAddress.street",
    "billingAddress.city",
    "billingAddress.state",
    "billingAddress.country",
    "billingAddress.zipCode",
    "creditCard.cardType",
    "creditCard.nameOnCard",
    "creditCard.cardNumber",
    "creditCard.securityCode",
    "creditCard.expirationMonth",
    "creditCard.expirationYear",
];

/// A form that passed validation, with its values unwrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCheckout {
    pub customer: Customer,
    pub shipping_address: Address,
    pub billing_address: Address,
}

#[derive(Default)]
struct Errors(Vec<FieldError>);

impl Errors {
    fn check(&mut self, field: &str, kinds: impl IntoIterator<Item = FieldErrorKind>) {
        self.0
            .extend(kinds.into_iter().map(|kind| FieldError::new(field, kind)));
    }
}

fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref()
}

fn owned(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

fn validate_address(errors: &mut Errors, prefix: &str, address: &AddressForm) {
    errors.check(
        &format!("{prefix}.street"),
        validators::text_field(text(&address.street)),
    );
    errors.check(
        &format!("{prefix}.city"),
        validators::text_field(text(&address.city)),
    );
    errors.check(
        &format!("{prefix}.state"),
        validators::required(text(&address.state)),
    );
    errors.check(
        &format!("{prefix}.country"),
        validators::required(text(&address.country)),
    );
    errors.check(
        &format!("{prefix}.zipCode"),
        validators::text_field(text(&address.zip_code)),
    );
}

impl AddressForm {
    fn to_address(&self) -> Address {
        Address {
            street: owned(&self.street),
            city: owned(&self.city),
            state: owned(&self.state),
            country: owned(&self.country),
            zip_code: owned(&self.zip_code),
        }
    }
}

impl CheckoutForm {
    pub fn validate(&self) -> Result<ValidCheckout, Vec<FieldError>> {
        let mut errors = Errors::default();
        let customer = &self.customer;
        errors.check(
            "customer.firstName",
            validators::text_field(text(&customer.first_name)),
        );
        errors.check(
            "customer.lastName",
            validators::text_field(text(&customer.last_name)),
        );
        errors.check(
            "customer.email",
            [
                validators::required(text(&customer.email)),
                validators::email(text(&customer.email)),
            ]
            .into_iter()
            .flatten(),
        );

        validate_address(&mut errors, "shippingAddress", &self.shipping_address);
        validate_address(&mut errors, "billingAddress", &self.billing_address);

        let card = &self.credit_card;
        errors.check(
            "creditCard.cardType",
            validators::required(text(&card.card_type)),
        );
        errors.check(
            "creditCard.nameOnCard",
            validators::text_field(text(&card.name_on_card)),
        );
        errors.check(
            "creditCard.cardNumber",
            [
                validators::required(text(&card.card_number)),
                validators::card_number(text(&card.card_number)),
            ]
            .into_iter()
            .flatten(),
        );
        errors.check(
            "creditCard.securityCode",
            [
                validators::required(text(&card.security_code)),
                validators::security_code(text(&card.security_code)),
            ]
            .into_iter()
            .flatten(),
        );
        if card.expiration_month.is_none() {
            errors.check("creditCard.expirationMonth", [FieldErrorKind::Required]);
        }
        if card.expiration_year.is_none() {
            errors.check("creditCard.expirationYear", [FieldErrorKind::Required]);
        }

        if !errors.0.is_empty() {
            return Err(errors.0);
        }
        Ok(ValidCheckout {
            customer: Customer {
                first_name: owned(&customer.first_name),
                last_name: owned(&customer.last_name),
                email: owned(&customer.email),
            },
            shipping_address: self.shipping_address.to_address(),
            billing_address: self.billing_address.to_address(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AddressSection {
    Shipping,
    Billing,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Invalid(Vec<FieldError>),
    Ready(Purchase),
}

/// Form controller state kept per session.
#[derive(Debug, Clone, Default)]
pub struct CheckoutSession {
    form: CheckoutForm,
    touched: BTreeSet<&'static str>,
    shipping_states: Vec<State>,
    billing_states: Vec<State>,
    billing_same_as_shipping: bool,
}

impl CheckoutSession {
    pub fn form(&self) -> &CheckoutForm {
        &self.form
    }

    pub fn set_form(&mut self, form: CheckoutForm) {
        self.form = form;
    }

    pub fn touched(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.touched.iter().copied()
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.contains(field)
    }

    pub fn mark_all_touched(&mut self) {
        self.touched.extend(FIELDS);
    }

    pub fn billing_same_as_shipping(&self) -> bool {
        self.billing_same_as_shipping
    }

    pub fn states(&self, section: AddressSection) -> &[State] {
        match section {
            AddressSection::Shipping => &self.shipping_states,
            AddressSection::Billing => &self.billing_states,
        }
    }

    fn address_mut(&mut self, section: AddressSection) -> &mut AddressForm {
        match section {
            AddressSection::Shipping => &mut self.form.shipping_address,
            AddressSection::Billing => &mut self.form.billing_address,
        }
    }

    /// On: billing takes the shipping values and state options.
    /// Off: billing is cleared.
    pub fn copy_shipping_to_billing(&mut self, enabled: bool) {
        self.billing_same_as_shipping = enabled;
        if enabled {
            self.form.billing_address = self.form.shipping_address.clone();
            self.billing_states = self.shipping_states.clone();
        } else {
            self.form.billing_address = AddressForm::default();
            self.billing_states.clear();
        }
    }

    /// Select a country for `section`; the previous state choice no longer
    /// applies until the new state list arrives.
    pub fn select_country(&mut self, section: AddressSection, country_code: &str) {
        let address = self.address_mut(section);
        address.country = Some(country_code.to_string());
        address.state = None;
    }

    /// Install the states returned by a country lookup and select the first.
    pub fn apply_states(&mut self, section: AddressSection, states: Vec<State>) -> Option<&State> {
        let first = states.first().map(|s| s.name.clone());
        self.address_mut(section).state = first;
        let slot = match section {
            AddressSection::Shipping => &mut self.shipping_states,
            AddressSection::Billing => &mut self.billing_states,
        };
        *slot = states;
        slot.first()
    }

    /// Validate and, when valid, snapshot the cart into a purchase.
    pub fn submit(&mut self, cart: &Cart) -> SubmitOutcome {
        match self.form.validate() {
            Err(errors) => {
                self.mark_all_touched();
                tracing::debug!(errors = errors.len(), "checkout form invalid");
                SubmitOutcome::Invalid(errors)
            }
            Ok(valid) => {
                let totals = cart.totals();
                SubmitOutcome::Ready(Purchase {
                    customer: valid.customer,
                    shipping_address: valid.shipping_address,
                    billing_address: valid.billing_address,
                    order: Order {
                        total_quantity: totals.total_quantity,
                        total_price: totals.total_price,
                    },
                    order_items: cart.items().iter().map(OrderItem::from).collect(),
                })
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

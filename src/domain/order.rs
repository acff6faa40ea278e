//! Checkout Entities
//!
//! An order captures the basket being bought, the card holder's contact,
//! an optional separate delivery contact and the payment card.

use serde::{Deserialize, Serialize};
use super::entity::{Entity, Orderable};

/// A postal contact as entered on the checkout form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Contact {
    pub firstname: String,
    pub lastname: String,
    pub address1: String,
    pub address2: String,
    pub address3: String,
    pub town: String,
    pub county: String,
    pub postcode: String,
    pub country_id: u32,
    pub telephone: String,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname).trim().to_string()
    }
}

/// Payment card details. No card number rules are applied here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Card {
    pub card_type_id: u32,
    pub holder: String,
    pub number: String,
    pub expiry_month: u32,
    pub expiry_year: u32,
    pub start_month: Option<u32>,
    pub start_year: Option<u32>,
    pub issue_number: Option<u32>,
    pub security_code: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Order {
    pub id: u32,
    pub basket_id: u32,
    pub email: String,
    pub additional_information: String,
    /// Deliver to the card holder's address
    pub use_card_holder_contact: bool,
    /// Card details are taken over the phone instead
    pub pay_by_telephone: bool,
    /// Card holder contact
    pub contact: Contact,
    /// Delivery contact when it differs from the card holder
    pub delivery_contact: Option<Contact>,
    pub card: Option<Card>,
    pub created_at: Option<i64>,
}

impl Order {
    /// Empty order for the checkout form with every section present
    pub fn for_basket(basket_id: u32) -> Self {
        Self {
            basket_id,
            delivery_contact: Some(Contact::default()),
            card: Some(Card::default()),
            ..Default::default()
        }
    }

    /// Address the goods are sent to
    pub fn delivery_address(&self) -> &Contact {
        match (&self.delivery_contact, self.use_card_holder_contact) {
            (Some(contact), false) => contact,
            _ => &self.contact,
        }
    }
}

impl Entity for Order {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn set_id(&mut self, id: Self::Id) {
        self.id = id;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BasketItem {
    pub product_id: u32,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Basket {
    pub id: u32,
    pub items: Vec<BasketItem>,
}

impl Entity for Basket {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn set_id(&mut self, id: Self::Id) {
        self.id = id;
    }
}

/// Delivery country; the whole list is one ordered group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Country {
    pub id: u32,
    pub name: String,
    pub position: i32,
}

impl Country {
    pub fn new(id: u32, name: &str, position: i32) -> Self {
        Self {
            id,
            name: name.to_string(),
            position,
        }
    }
}

impl Entity for Country {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn set_id(&mut self, id: Self::Id) {
        self.id = id;
    }
}

impl Orderable for Country {
    fn position(&self) -> i32 {
        self.position
    }

    fn set_position(&mut self, position: i32) {
        self.position = position;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CardType {
    pub id: u32,
    pub name: String,
    /// Whether the issue number field applies (e.g. Maestro)
    pub requires_issue_number: bool,
}

impl Entity for CardType {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn set_id(&mut self, id: Self::Id) {
        self.id = id;
    }
}

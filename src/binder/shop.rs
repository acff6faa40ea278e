//! Form bindings for the shop's editable entities

use crate::domain::{Card, Category, Contact, Order, ROOT_CATEGORY_ID};
use super::{parse_bool, parse_number, parse_optional_number, require, Bindable};

impl Bindable for Category {
    fn bind_field(&mut self, field: &str, value: &str) -> Result<(), String> {
        match field {
            "name" => self.name = value.trim().to_string(),
            "parentid" => self.parent_id = parse_optional_number("Parent", value)?,
            _ => {}
        }
        Ok(())
    }

    fn validate(&self) -> Vec<String> {
        let mut messages = Vec::new();
        if self.name.trim().is_empty() {
            messages.push("You must enter a name for the category".to_string());
        }
        if self.parent_id.is_none() && self.id != ROOT_CATEGORY_ID {
            messages.push("You must select a parent category".to_string());
        }
        messages
    }
}

impl Bindable for Contact {
    fn bind_field(&mut self, field: &str, value: &str) -> Result<(), String> {
        match field {
            "firstname" => self.firstname = value.to_string(),
            "lastname" => self.lastname = value.to_string(),
            "address1" => self.address1 = value.to_string(),
            "address2" => self.address2 = value.to_string(),
            "address3" => self.address3 = value.to_string(),
            "town" => self.town = value.to_string(),
            "county" => self.county = value.to_string(),
            "postcode" => self.postcode = value.to_string(),
            "countryid" => self.country_id = parse_number("Country", value)?,
            "telephone" => self.telephone = value.to_string(),
            _ => {}
        }
        Ok(())
    }

    fn validate(&self) -> Vec<String> {
        let mut messages = Vec::new();
        require(&mut messages, "First Name", &self.firstname);
        require(&mut messages, "Last Name", &self.lastname);
        require(&mut messages, "Address", &self.address1);
        require(&mut messages, "Town", &self.town);
        require(&mut messages, "Postcode", &self.postcode);
        if self.country_id == 0 {
            messages.push("You must select a country".to_string());
        }
        messages
    }
}

impl Bindable for Card {
    fn bind_field(&mut self, field: &str, value: &str) -> Result<(), String> {
        match field {
            "cardtypeid" => self.card_type_id = parse_number("Card Type", value)?,
            "holder" => self.holder = value.to_string(),
            "number" => self.number = value.trim().to_string(),
            "expirymonth" => self.expiry_month = parse_number("Expiry Month", value)?,
            "expiryyear" => self.expiry_year = parse_number("Expiry Year", value)?,
            "startmonth" => self.start_month = parse_optional_number("Start Month", value)?,
            "startyear" => self.start_year = parse_optional_number("Start Year", value)?,
            "issuenumber" => self.issue_number = parse_optional_number("Issue Number", value)?,
            "securitycode" => self.security_code = parse_optional_number("Security Code", value)?,
            _ => {}
        }
        Ok(())
    }

    fn validate(&self) -> Vec<String> {
        let mut messages = Vec::new();
        if self.card_type_id == 0 {
            messages.push("You must select a card type".to_string());
        }
        require(&mut messages, "Card Holder", &self.holder);
        require(&mut messages, "Card Number", &self.number);
        messages
    }
}

impl Bindable for Order {
    fn bind_field(&mut self, field: &str, value: &str) -> Result<(), String> {
        match field {
            "orderid" => self.id = parse_number("Order", value)?,
            "basketid" => self.basket_id = parse_number("Basket", value)?,
            "email" => self.email = value.trim().to_string(),
            "additionalinformation" => self.additional_information = value.to_string(),
            "usecardholdercontact" => {
                self.use_card_holder_contact = parse_bool("Use Card Holder Contact", value)?
            }
            "paybytelephone" => self.pay_by_telephone = parse_bool("Pay By Telephone", value)?,
            _ => {}
        }
        Ok(())
    }

    fn validate(&self) -> Vec<String> {
        let mut messages = Vec::new();
        if self.email.is_empty() {
            messages.push("You must enter an email address".to_string());
        } else if !self.email.contains('@') {
            messages.push(format!("'{}' is not a valid email address", self.email));
        }
        messages
    }
}

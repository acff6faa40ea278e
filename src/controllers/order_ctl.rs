//! Checkout
//!
//! Shows the checkout form for a basket and turns the submitted form into
//! an order. Card details are bound but not checked against card rules.

use std::sync::Arc;

use crate::binder::{FormData, ValidatingBinder, ValidationError};
use crate::domain::{Basket, Card, CardType, Contact, Country, DomainError, DomainResult, Order};
use crate::repository::Repository;
use super::view::{ShopViewData, ViewResult};

pub struct OrderController {
    orders: Arc<dyn Repository<Order>>,
    baskets: Arc<dyn Repository<Basket>>,
    countries: Arc<dyn Repository<Country>>,
    card_types: Arc<dyn Repository<CardType>>,
}

impl OrderController {
    pub fn new(
        orders: Arc<dyn Repository<Order>>,
        baskets: Arc<dyn Repository<Basket>>,
        countries: Arc<dyn Repository<Country>>,
        card_types: Arc<dyn Repository<CardType>>,
    ) -> Self {
        Self {
            orders,
            baskets,
            countries,
            card_types,
        }
    }

    pub async fn checkout(&self, basket_id: u32) -> DomainResult<ViewResult> {
        let basket = self
            .baskets
            .find_by_id(basket_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Basket", basket_id))?;

        let order = Order::for_basket(basket.id);
        Ok(ViewResult::new(
            "Checkout",
            self.checkout_view_data().await?.with_order(order),
        ))
    }

    pub async fn place_order(&self, form: &FormData) -> DomainResult<ViewResult> {
        let mut order = Order::default();
        if let Err(validation) = bind_order(&mut order, form) {
            return Ok(ViewResult::new(
                "Checkout",
                self.checkout_view_data()
                    .await?
                    .with_order(order)
                    .with_error_message(validation.to_string()),
            ));
        }

        let order = self.orders.create(&order).await?;
        log::info!("Order {} placed for basket {}", order.id, order.basket_id);

        Ok(ViewResult::new("Item", ShopViewData::default().with_order(order)))
    }

    async fn checkout_view_data(&self) -> DomainResult<ShopViewData> {
        let mut countries = self.countries.list().await?;
        countries.sort_by_key(|c| (c.position, c.id));
        let card_types = self.card_types.list().await?;
        Ok(ShopViewData::default()
            .with_countries(countries)
            .with_card_types(card_types))
    }
}

/// Fill `order` and its sections from the checkout form
fn bind_order(order: &mut Order, form: &FormData) -> Result<(), ValidationError> {
    let order_result = ValidatingBinder::update_from(order, form, "order");

    let mut contact = Contact::default();
    let contact_result = ValidatingBinder::update_from(&mut contact, form, "cardcontact");
    order.contact = contact;

    let delivery_result = if order.use_card_holder_contact {
        order.delivery_contact = None;
        Ok(())
    } else {
        let mut delivery = Contact::default();
        let result = ValidatingBinder::update_from(&mut delivery, form, "deliverycontact");
        order.delivery_contact = Some(delivery);
        result
    };

    let card_result = if order.pay_by_telephone {
        order.card = None;
        Ok(())
    } else {
        let mut card = Card::default();
        let result = ValidatingBinder::update_from(&mut card, form, "card");
        order.card = Some(card);
        result
    };

    let confirm_result = match form.get("emailconfirm") {
        Some(confirm) if confirm.trim() != order.email => Err(ValidationError::new(
            "Email and Email Confirm must be the same",
        )),
        _ => Ok(()),
    };

    ValidationError::combine([
        order_result,
        contact_result,
        delivery_result,
        card_result,
        confirm_result,
    ])
}

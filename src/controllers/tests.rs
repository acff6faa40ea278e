//! Controller Tests
//!
//! Category and product actions run against in-memory SQLite; checkout runs
//! against in-memory repositories.

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use crate::binder::FormData;
    use crate::controllers::{CategoryController, OrderController, ProductController};
    use crate::domain::{
        Basket, CardType, Category, Country, DomainError, Order, Product, ROOT_CATEGORY_ID,
    };
    use crate::repository::{
        init_db, CategoryRepository, MemoryRepository, ProductRepository, Repository,
    };

    async fn setup_categories() -> (Arc<CategoryRepository>, CategoryController<CategoryRepository>) {
        let db = init_db(&PathBuf::from(":memory:")).await.expect("Failed to init test DB");
        let repo = Arc::new(CategoryRepository::new(db.connection()));
        (repo.clone(), CategoryController::new(repo))
    }

    fn category_form(name: &str, parent: u32) -> FormData {
        FormData::new()
            .with("category.name", name)
            .with("category.parentid", &parent.to_string())
    }

    async fn add(controller: &CategoryController<CategoryRepository>, name: &str, parent: u32) -> Category {
        let view = controller.update(0, &category_form(name, parent)).await.unwrap();
        assert_eq!(view.data.error_message, None);
        view.data.category.expect("saved category")
    }

    fn sibling_names(view: &crate::controllers::ViewResult) -> Vec<String> {
        view.data
            .category_tree
            .as_ref()
            .unwrap()
            .children
            .iter()
            .map(|node| node.category.name.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_index_shows_root_tree() {
        let (_, controller) = setup_categories().await;

        let view = controller.index().await.unwrap();
        assert_eq!(view.view_name, "Index");
        let tree = view.data.category_tree.unwrap();
        assert_eq!(tree.category.id, ROOT_CATEGORY_ID);
        assert!(tree.children.is_empty());
    }

    #[tokio::test]
    async fn test_new_category_gets_next_position() {
        let (_, controller) = setup_categories().await;

        let view = controller.new_category(ROOT_CATEGORY_ID).await.unwrap();
        assert_eq!(view.view_name, "Edit");
        let blank = view.data.category.unwrap();
        assert_eq!(blank.parent_id, Some(ROOT_CATEGORY_ID));
        assert_eq!(blank.position, 0);

        add(&controller, "Shirts", ROOT_CATEGORY_ID).await;
        add(&controller, "Hats", ROOT_CATEGORY_ID).await;

        let view = controller.new_category(ROOT_CATEGORY_ID).await.unwrap();
        assert_eq!(view.data.category.unwrap().position, 2);
    }

    #[tokio::test]
    async fn test_update_creates_category() {
        let (repo, controller) = setup_categories().await;

        let view = controller
            .update(0, &category_form("Shirts", ROOT_CATEGORY_ID))
            .await
            .unwrap();

        assert_eq!(view.view_name, "Edit");
        assert_eq!(view.data.message.as_deref(), Some("The category has been saved"));
        let saved = view.data.category.unwrap();
        assert!(saved.id > ROOT_CATEGORY_ID);
        assert_eq!(repo.find_by_id(saved.id).await.unwrap().unwrap().name, "Shirts");
        // Parent picker lists every category by name
        let names: Vec<&str> = view.data.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["root", "Shirts"]);
    }

    #[tokio::test]
    async fn test_update_with_invalid_form_rerenders_edit() {
        let (repo, controller) = setup_categories().await;

        let view = controller
            .update(0, &category_form("", ROOT_CATEGORY_ID))
            .await
            .unwrap();

        assert_eq!(view.view_name, "Edit");
        assert_eq!(
            view.data.error_message.as_deref(),
            Some("You must enter a name for the category")
        );
        assert_eq!(view.data.message, None);
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_existing_keeps_position() {
        let (repo, controller) = setup_categories().await;
        add(&controller, "Shirts", ROOT_CATEGORY_ID).await;
        let hats = add(&controller, "Hats", ROOT_CATEGORY_ID).await;

        controller
            .update(hats.id, &category_form("Caps", ROOT_CATEGORY_ID))
            .await
            .unwrap();

        let stored = repo.find_by_id(hats.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Caps");
        assert_eq!(stored.position, 1);
    }

    #[tokio::test]
    async fn test_reparent_appends_to_new_siblings() {
        let (repo, controller) = setup_categories().await;
        let clothes = add(&controller, "Clothes", ROOT_CATEGORY_ID).await;
        add(&controller, "Shirts", clothes.id).await;
        let hats = add(&controller, "Hats", ROOT_CATEGORY_ID).await;

        controller
            .update(hats.id, &category_form("Hats", clothes.id))
            .await
            .unwrap();

        let stored = repo.find_by_id(hats.id).await.unwrap().unwrap();
        assert_eq!(stored.parent_id, Some(clothes.id));
        assert_eq!(stored.position, 1);
    }

    #[tokio::test]
    async fn test_cannot_move_below_itself() {
        let (repo, controller) = setup_categories().await;
        let clothes = add(&controller, "Clothes", ROOT_CATEGORY_ID).await;
        let shirts = add(&controller, "Shirts", clothes.id).await;

        let view = controller
            .update(clothes.id, &category_form("Clothes", shirts.id))
            .await
            .unwrap();

        assert_eq!(
            view.data.error_message.as_deref(),
            Some("A category cannot be moved below itself")
        );
        let stored = repo.find_by_id(clothes.id).await.unwrap().unwrap();
        assert_eq!(stored.parent_id, Some(ROOT_CATEGORY_ID));
    }

    #[tokio::test]
    async fn test_edit_missing_category() {
        let (_, controller) = setup_categories().await;

        let err = controller.edit(77).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_move_up_and_down_reorder_siblings() {
        let (repo, controller) = setup_categories().await;
        add(&controller, "Shirts", ROOT_CATEGORY_ID).await;
        let hats = add(&controller, "Hats", ROOT_CATEGORY_ID).await;
        let clothes_child = add(&controller, "Socks", hats.id).await;
        let coats = add(&controller, "Coats", ROOT_CATEGORY_ID).await;

        let view = controller.move_up(coats.id).await.unwrap();
        assert_eq!(view.view_name, "Index");
        assert_eq!(sibling_names(&view), vec!["Shirts", "Coats", "Hats"]);

        let view = controller.move_down(coats.id).await.unwrap();
        assert_eq!(sibling_names(&view), vec!["Shirts", "Hats", "Coats"]);

        // Already last: nothing changes
        let view = controller.move_down(coats.id).await.unwrap();
        assert_eq!(sibling_names(&view), vec!["Shirts", "Hats", "Coats"]);

        let socks = repo.find_by_id(clothes_child.id).await.unwrap().unwrap();
        assert_eq!(socks.position, 0);
    }

    #[tokio::test]
    async fn test_move_missing_category() {
        let (_, controller) = setup_categories().await;

        let err = controller.move_up(404).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_products_ordered_within_category() {
        let db = init_db(&PathBuf::from(":memory:")).await.unwrap();
        let categories = CategoryRepository::new(db.connection());
        let products = Arc::new(ProductRepository::new(db.connection()));
        let controller = ProductController::new(products.clone());

        let shirts = categories
            .create(&Category::new(0, "Shirts".to_string(), Some(ROOT_CATEGORY_ID), 0))
            .await
            .unwrap();
        let hats = categories
            .create(&Category::new(0, "Hats".to_string(), Some(ROOT_CATEGORY_ID), 1))
            .await
            .unwrap();

        let oxford = controller.insert(Product::new(0, "Oxford".to_string(), shirts.id, 2500, 0)).await.unwrap();
        let polo = controller.insert(Product::new(0, "Polo".to_string(), shirts.id, 1500, 0)).await.unwrap();
        let trilby = controller.insert(Product::new(0, "Trilby".to_string(), hats.id, 3000, 0)).await.unwrap();
        assert_eq!((oxford.position, polo.position, trilby.position), (0, 1, 0));

        let blank = controller.new_product(shirts.id).await.unwrap();
        assert_eq!(blank.data.product.unwrap().position, 2);

        let view = controller.move_up(polo.id).await.unwrap();
        let names: Vec<&str> = view.data.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Polo", "Oxford"]);

        let trilby = products.find_by_id(trilby.id).await.unwrap().unwrap();
        assert_eq!(trilby.position, 0);
    }

    #[tokio::test]
    async fn test_insert_into_full_category_is_conflict() {
        let products: Arc<MemoryRepository<Product>> = Arc::new(MemoryRepository::with_items(vec![
            Product::new(1, "Oxford".to_string(), 3, 2500, i32::MAX),
        ]));
        let controller = ProductController::new(products.clone());

        let err = controller.insert(Product::new(0, "Polo".to_string(), 3, 1500, 0)).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(products.list().await.unwrap().len(), 1);

        // Other categories still get positions
        let trilby = controller.insert(Product::new(0, "Trilby".to_string(), 4, 3000, 0)).await.unwrap();
        assert_eq!(trilby.position, 0);
    }

    #[tokio::test]
    async fn test_product_requires_name() {
        let products: Arc<MemoryRepository<Product>> = Arc::new(MemoryRepository::new());
        let controller = ProductController::new(products);

        let err = controller.insert(Product::new(0, " ".to_string(), 1, 0, 0)).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    // ========================
    // Checkout
    // ========================

    struct Checkout {
        orders: Arc<MemoryRepository<Order>>,
        controller: OrderController,
    }

    fn setup_checkout() -> Checkout {
        let orders: Arc<MemoryRepository<Order>> = Arc::new(MemoryRepository::new());
        let baskets = Arc::new(MemoryRepository::with_items(vec![Basket { id: 6, items: Vec::new() }]));
        let countries = Arc::new(MemoryRepository::with_items(vec![
            Country::new(1, "United Kingdom", 1),
            Country::new(2, "France", 0),
        ]));
        let card_types = Arc::new(MemoryRepository::with_items(vec![CardType {
            id: 1,
            name: "Visa".to_string(),
            requires_issue_number: false,
        }]));
        let controller = OrderController::new(orders.clone(), baskets, countries, card_types);
        Checkout { orders, controller }
    }

    fn add_contact(form: FormData, prefix: &str) -> FormData {
        form.with(&format!("{}.firstname", prefix), "Mike")
            .with(&format!("{}.lastname", prefix), "Hadlow")
            .with(&format!("{}.address1", prefix), "23 The Street")
            .with(&format!("{}.address2", prefix), "The Manor")
            .with(&format!("{}.address3", prefix), "")
            .with(&format!("{}.town", prefix), "Hove")
            .with(&format!("{}.county", prefix), "East Sussex")
            .with(&format!("{}.postcode", prefix), "BN6 2EE")
            .with(&format!("{}.countryid", prefix), "1")
            .with(&format!("{}.telephone", prefix), "01273 234234")
    }

    fn place_order_form() -> FormData {
        let form = FormData::new()
            .with("order.orderid", "10")
            .with("order.basketid", "6");
        let form = add_contact(form, "cardcontact")
            .with("order.email", "mike@mike.com")
            .with("emailconfirm", "mike@mike.com")
            .with("order.usecardholdercontact", "False");
        add_contact(form, "deliverycontact")
            .with("order.additionalinformation", "some more info")
            .with("card.cardtypeid", "1")
            .with("card.holder", "MR M HADLOW")
            .with("card.number", "1111111111111117")
            .with("card.expirymonth", "3")
            .with("card.expiryyear", "2009")
            .with("card.startmonth", "2")
            .with("card.startyear", "2003")
            .with("card.issuenumber", "3")
            .with("card.securitycode", "235")
            .with("order.paybytelephone", "False")
    }

    #[tokio::test]
    async fn test_checkout_displays_form() {
        let checkout = setup_checkout();

        let view = checkout.controller.checkout(6).await.unwrap();

        assert_eq!(view.view_name, "Checkout");
        let order = view.data.order.unwrap();
        assert_eq!(order.basket_id, 6);
        assert!(order.delivery_contact.is_some());
        assert!(order.card.is_some());
        let countries: Vec<&str> = view.data.countries.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(countries, vec!["France", "United Kingdom"]);
        assert_eq!(view.data.card_types.len(), 1);
    }

    #[tokio::test]
    async fn test_checkout_unknown_basket() {
        let checkout = setup_checkout();

        let err = checkout.controller.checkout(99).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_place_order_creates_order() {
        let checkout = setup_checkout();
        let form = place_order_form();

        let view = checkout.controller.place_order(&form).await.unwrap();

        assert_eq!(view.data.error_message, None);
        assert_eq!(view.view_name, "Item");
        let order = view.data.order.unwrap();
        assert_eq!(order.id, 10);
        assert_eq!(order.email, "mike@mike.com");
        assert_eq!(order.additional_information, "some more info");
        assert!(!order.use_card_holder_contact);
        assert!(!order.pay_by_telephone);

        for contact in [&order.contact, order.delivery_contact.as_ref().unwrap()] {
            assert_eq!(contact.firstname, "Mike");
            assert_eq!(contact.lastname, "Hadlow");
            assert_eq!(contact.address1, "23 The Street");
            assert_eq!(contact.address3, "");
            assert_eq!(contact.postcode, "BN6 2EE");
            assert_eq!(contact.country_id, 1);
            assert_eq!(contact.telephone, "01273 234234");
        }

        let card = order.card.unwrap();
        assert_eq!(card.card_type_id, 1);
        assert_eq!(card.holder, "MR M HADLOW");
        assert_eq!(card.number, "1111111111111117");
        assert_eq!((card.expiry_month, card.expiry_year), (3, 2009));
        assert_eq!((card.start_month, card.start_year), (Some(2), Some(2003)));
        assert_eq!(card.issue_number, Some(3));
        assert_eq!(card.security_code, Some(235));

        assert!(checkout.orders.find_by_id(10).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_place_order_card_holder_delivery_and_phone_payment() {
        let checkout = setup_checkout();
        let form = add_contact(FormData::new(), "cardcontact")
            .with("order.basketid", "6")
            .with("order.email", "mike@mike.com")
            .with("order.usecardholdercontact", "true,false")
            .with("order.paybytelephone", "True");

        let view = checkout.controller.place_order(&form).await.unwrap();

        assert_eq!(view.view_name, "Item");
        let order = view.data.order.unwrap();
        assert!(order.id > 0);
        assert!(order.delivery_contact.is_none());
        assert!(order.card.is_none());
        assert_eq!(order.delivery_address().town, "Hove");
    }

    #[tokio::test]
    async fn test_place_order_validation_failure_rerenders_checkout() {
        let checkout = setup_checkout();
        let form = place_order_form()
            .with("card.expiryyear", "soon")
            .with("emailconfirm", "other@mike.com");

        let view = checkout.controller.place_order(&form).await.unwrap();

        assert_eq!(view.view_name, "Checkout");
        let message = view.data.error_message.unwrap();
        assert!(message.contains("is not a valid value for Expiry Year"));
        assert!(message.contains("Email and Email Confirm must be the same"));
        assert!(view.data.order.is_some());
        assert_eq!(view.data.countries.len(), 2);
        assert!(checkout.orders.list().await.unwrap().is_empty());
    }
}

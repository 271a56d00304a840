use chrono::{DateTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};

use crate::database::{CheckoutReceipt, ClassTarget, Store};
use crate::models::{CheckoutRequest, Payment};
use crate::utils::ApiError;

fn parse_object_id(value: &str, field: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(value).map_err(|_| ApiError::InvalidArgument(format!("Invalid {}", field)))
}

fn parse_date(value: Option<&str>) -> Result<BsonDateTime, ApiError> {
    match value {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| BsonDateTime::from_millis(dt.timestamp_millis()))
            .map_err(|_| ApiError::InvalidArgument("Invalid date".to_string())),
        None => Ok(BsonDateTime::from_millis(Utc::now().timestamp_millis())),
    }
}

/// Turns a purchase request into a payment record plus the seat and sales
/// bookkeeping.
///
/// All validation happens before the store is touched; the store then applies
/// every write or none.
pub async fn checkout(store: &dyn Store, request: CheckoutRequest) -> Result<CheckoutReceipt, ApiError> {
    if request.available_seats <= 0 {
        log::warn!("⚠️ Checkout rejected, no seats left (client saw {})", request.available_seats);
        return Err(ApiError::InvalidState("No seats available for this class".to_string()));
    }

    let card_id = parse_object_id(&request.item_id, "itemId")?;

    let class = match request.class_id.as_deref() {
        Some(class_id) => ClassTarget::Id(parse_object_id(class_id, "classId")?),
        None => {
            log::warn!(
                "⚠️ Checkout without classId, falling back to first class of {}",
                request.instructor_email
            );
            ClassTarget::FirstOwnedBy(request.instructor_email.clone())
        }
    };

    let payment = Payment {
        id: None,
        email: request.email,
        item_id: request.item_id,
        class_id: request.class_id,
        instructor_email: request.instructor_email,
        available_seats: request.available_seats,
        date: parse_date(request.date.as_deref())?,
        price: request.price,
        transaction_id: request.transaction_id,
    };

    let receipt = store.checkout(&payment, card_id, &class).await?;

    log::info!(
        "✅ Checkout committed: payment {} for {}",
        receipt.insert_result.inserted_id,
        payment.email
    );

    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::models::{Card, Class, Role, User};

    struct Fixture {
        store: MemoryStore,
        class_id: ObjectId,
        card_id: ObjectId,
    }

    fn fixture(seats: i64) -> Fixture {
        let store = MemoryStore::new();
        store.seed_user(User {
            id: None,
            email: "teach@example.com".into(),
            name: Some("Teach".into()),
            photo: None,
            phone: None,
            address: None,
            gender: None,
            role: Some(Role::Instructor),
            sell_count: 4,
        });
        let class_id = store.seed_class(Class {
            id: None,
            name: "Portraits".into(),
            image: None,
            instructor_name: Some("Teach".into()),
            instructor_email: "teach@example.com".into(),
            available_seats: seats,
            price: 49.5,
            sell_count: 7,
        });
        let card_id = store.seed_card(Card {
            id: None,
            user_email: "buyer@example.com".into(),
            class_id: Some(class_id.to_hex()),
            name: Some("Portraits".into()),
            image: None,
            instructor_name: Some("Teach".into()),
            instructor_email: Some("teach@example.com".into()),
            price: 49.5,
        });
        Fixture {
            store,
            class_id,
            card_id,
        }
    }

    fn request(f: &Fixture, seats_seen: i64) -> CheckoutRequest {
        CheckoutRequest {
            email: "buyer@example.com".into(),
            item_id: f.card_id.to_hex(),
            class_id: Some(f.class_id.to_hex()),
            instructor_email: "teach@example.com".into(),
            available_seats: seats_seen,
            price: 49.5,
            date: None,
            transaction_id: Some("pi_123".into()),
        }
    }

    #[tokio::test]
    async fn test_checkout_applies_all_bookkeeping() {
        let f = fixture(3);

        let receipt = checkout(&f.store, request(&f, 3)).await.unwrap();

        assert_eq!(receipt.delete_result.deleted_count, 1);
        assert_eq!(receipt.class_result.modified_count, 1);

        let class = &f.store.classes()[0];
        assert_eq!(class.available_seats, 2);
        assert_eq!(class.sell_count, 8);

        let instructor = f
            .store
            .users()
            .into_iter()
            .find(|u| u.email == "teach@example.com")
            .unwrap();
        assert_eq!(instructor.sell_count, 5);

        assert!(f.store.cards().is_empty());
        let payments = f.store.payments();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].item_id, f.card_id.to_hex());
    }

    #[tokio::test]
    async fn test_checkout_with_client_seen_zero_seats_touches_nothing() {
        let f = fixture(3);

        let err = checkout(&f.store, request(&f, 0)).await.unwrap_err();

        assert!(matches!(err, ApiError::InvalidState(_)));
        assert_eq!(f.store.write_count(), 0);
        assert_eq!(f.store.cards().len(), 1);
        assert!(f.store.payments().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_against_sold_out_class_is_rejected() {
        let f = fixture(0);

        // Stale client still thinks a seat is left
        let err = checkout(&f.store, request(&f, 1)).await.unwrap_err();

        assert!(matches!(err, ApiError::InvalidState(_)));
        assert_eq!(f.store.classes()[0].available_seats, 0);
        assert_eq!(f.store.classes()[0].sell_count, 7);
        assert_eq!(f.store.cards().len(), 1);
        assert!(f.store.payments().is_empty());
    }

    #[tokio::test]
    async fn test_seats_never_go_negative_over_repeated_checkouts() {
        let f = fixture(2);

        for _ in 0..5 {
            let card_id = f.store.seed_card(Card {
                id: None,
                user_email: "buyer@example.com".into(),
                class_id: Some(f.class_id.to_hex()),
                name: None,
                image: None,
                instructor_name: None,
                instructor_email: None,
                price: 49.5,
            });
            let mut req = request(&f, 5);
            req.item_id = card_id.to_hex();
            let _ = checkout(&f.store, req).await;
            assert!(f.store.classes()[0].available_seats >= 0);
        }

        assert_eq!(f.store.classes()[0].available_seats, 0);
        assert_eq!(f.store.payments().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_card_rolls_back_checkout() {
        let f = fixture(3);
        let mut req = request(&f, 3);
        req.item_id = ObjectId::new().to_hex();

        let err = checkout(&f.store, req).await.unwrap_err();

        assert!(matches!(err, ApiError::InvalidState(_)));
        assert_eq!(f.store.classes()[0].available_seats, 3);
        assert!(f.store.payments().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_ids_are_invalid_arguments() {
        let f = fixture(3);
        let mut req = request(&f, 3);
        req.item_id = "not-an-id".into();

        let err = checkout(&f.store, req).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));

        let mut req = request(&f, 3);
        req.class_id = Some("nope".into());
        let err = checkout(&f.store, req).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
        assert_eq!(f.store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_legacy_request_without_class_id_targets_instructor_class() {
        let f = fixture(3);
        let mut req = request(&f, 3);
        req.class_id = None;

        checkout(&f.store, req).await.unwrap();

        assert_eq!(f.store.classes()[0].available_seats, 2);
    }

    #[tokio::test]
    async fn test_legacy_request_never_charges_another_class() {
        let f = fixture(0);
        f.store.seed_class(Class {
            id: None,
            name: "Landscapes".into(),
            image: None,
            instructor_name: Some("Teach".into()),
            instructor_email: "teach@example.com".into(),
            available_seats: 6,
            price: 30.0,
            sell_count: 0,
        });
        let mut req = request(&f, 1);
        req.class_id = None;

        let err = checkout(&f.store, req).await.unwrap_err();

        assert!(matches!(err, ApiError::InvalidState(_)));
        let classes = f.store.classes();
        assert_eq!(classes[0].available_seats, 0);
        assert_eq!((classes[1].available_seats, classes[1].sell_count), (6, 0));
        assert!(f.store.payments().is_empty());
    }

    #[test]
    fn test_client_supplied_date_is_kept() {
        let date = parse_date(Some("2024-03-01T10:00:00Z")).unwrap();
        assert_eq!(date.timestamp_millis(), 1_709_287_200_000);
        assert!(parse_date(Some("yesterday")).is_err());
    }
}

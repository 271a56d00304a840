use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, ClientSession, Collection, Database, IndexModel};
use std::time::Duration;

use super::{
    CheckoutReceipt, ClassTarget, DeleteSummary, InsertSummary, ListOrder, Store, StoreError,
    StoreResult, UpdateSummary, CARDS, CLASSES, PAYMENTS, USERS,
};
use crate::models::{Card, Class, Payment, Role, User, UserProfile};

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn connect(uri: &str, db_name: &str) -> StoreResult<Self> {
        let mut client_options = ClientOptions::parse(uri).await?;

        client_options.app_name = Some("creative-snap-service".to_string());
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(Duration::from_secs(300));
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        let mongodb = Self { client, db };
        mongodb.ping().await?;
        log::info!("✅ Pinged deployment, database: {}", db_name);

        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the indexes the routes filter and sort on
    async fn ensure_indexes(&self) -> StoreResult<()> {
        log::info!("🔧 Creating database indexes...");

        let users = self.collection::<Document>(USERS);

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        // A failing unique index means duplicate emails already exist; keep serving
        match users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email) unique"),
            Err(e) => log::warn!("   ⚠️  Could not create users(email) unique index: {}", e),
        }

        let indexes: [(&str, Document); 4] = [
            (USERS, doc! { "role": 1, "sell_count": -1 }),
            (CLASSES, doc! { "sell_count": -1 }),
            (CARDS, doc! { "user_email": 1 }),
            (PAYMENTS, doc! { "email": 1, "date": -1 }),
        ];

        for (name, keys) in indexes {
            let model = IndexModel::builder().keys(keys.clone()).build();
            match self.collection::<Document>(name).create_index(model).await {
                Ok(_) => log::info!("   ✅ Index created: {}({})", name, keys),
                Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
            }
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    /// Closes the connection pool; call once the HTTP server has stopped
    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }

    fn sort_for(order: ListOrder) -> Option<Document> {
        match order {
            ListOrder::Natural => None,
            ListOrder::Popular => Some(doc! { "sell_count": -1 }),
        }
    }

    async fn find_all<T>(&self, name: &str, filter: Document, sort: Option<Document>) -> StoreResult<Vec<T>>
    where
        T: serde::de::DeserializeOwned + Send + Sync + Unpin,
    {
        let collection = self.collection::<T>(name);
        let cursor = match sort {
            Some(sort) => collection.find(filter).sort(sort).await?,
            None => collection.find(filter).await?,
        };
        Ok(cursor.try_collect().await?)
    }

    async fn checkout_in_session(
        &self,
        session: &mut ClientSession,
        payment: &Payment,
        card_id: ObjectId,
        class: &ClassTarget,
    ) -> StoreResult<CheckoutReceipt> {
        let class_id = match class {
            ClassTarget::Id(id) => *id,
            ClassTarget::FirstOwnedBy(email) => {
                let first = self
                    .collection::<Class>(CLASSES)
                    .find_one(doc! { "instructor_email": email })
                    .sort(doc! { "_id": 1 })
                    .session(&mut *session)
                    .await?;
                first.and_then(|c| c.id).ok_or(StoreError::SeatsExhausted)?
            }
        };

        let class_result = self
            .collection::<Document>(CLASSES)
            .update_one(
                doc! { "_id": class_id, "Available_seats": { "$gt": 0 } },
                doc! { "$inc": { "Available_seats": -1_i64, "sell_count": 1_i64 } },
            )
            .session(&mut *session)
            .await?;

        if class_result.matched_count == 0 {
            return Err(StoreError::SeatsExhausted);
        }

        let insert_result = self
            .collection::<Payment>(PAYMENTS)
            .insert_one(payment)
            .session(&mut *session)
            .await?;

        let delete_result = self
            .collection::<Document>(CARDS)
            .delete_one(doc! { "_id": card_id })
            .session(&mut *session)
            .await?;

        if delete_result.deleted_count == 0 {
            return Err(StoreError::CardNotFound);
        }

        let instructor_result = self
            .collection::<Document>(USERS)
            .update_one(
                doc! { "email": &payment.instructor_email },
                doc! { "$inc": { "sell_count": 1_i64 } },
            )
            .upsert(true)
            .session(&mut *session)
            .await?;

        Ok(CheckoutReceipt {
            insert_result: insert_result.into(),
            delete_result: delete_result.into(),
            class_result: class_result.into(),
            instructor_result: instructor_result.into(),
        })
    }
}

#[async_trait]
impl Store for MongoDB {
    async fn ping(&self) -> StoreResult<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn upsert_user(&self, email: &str, profile: &UserProfile) -> StoreResult<UpdateSummary> {
        let mut fields = mongodb::bson::to_document(profile)
            .map_err(|e| StoreError::Backend(format!("Failed to encode profile: {}", e)))?;
        fields.insert("email", email);

        let update = doc! {
            "$set": fields,
            "$setOnInsert": { "role": Role::Student.as_str(), "sell_count": 0_i64 },
        };

        let result = self
            .collection::<User>(USERS)
            .update_one(doc! { "email": email }, update)
            .upsert(true)
            .await?;

        Ok(result.into())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        self.find_all(USERS, doc! {}, None).await
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.collection::<User>(USERS).find_one(doc! { "email": email }).await?)
    }

    async fn list_instructors(&self, order: ListOrder) -> StoreResult<Vec<User>> {
        let filter = doc! { "role": Role::Instructor.as_str() };
        self.find_all(USERS, filter, Self::sort_for(order)).await
    }

    async fn set_user_role(&self, id: ObjectId, role: Role) -> StoreResult<UpdateSummary> {
        let result = self
            .collection::<User>(USERS)
            .update_one(doc! { "_id": id }, doc! { "$set": { "role": role.as_str() } })
            .await?;
        Ok(result.into())
    }

    async fn delete_user(&self, id: ObjectId) -> StoreResult<DeleteSummary> {
        let result = self.collection::<User>(USERS).delete_one(doc! { "_id": id }).await?;
        Ok(result.into())
    }

    async fn insert_class(&self, class: &Class) -> StoreResult<InsertSummary> {
        let result = self.collection::<Class>(CLASSES).insert_one(class).await?;
        Ok(result.into())
    }

    async fn list_classes(&self, order: ListOrder) -> StoreResult<Vec<Class>> {
        self.find_all(CLASSES, doc! {}, Self::sort_for(order)).await
    }

    async fn insert_card(&self, card: &Card) -> StoreResult<InsertSummary> {
        let result = self.collection::<Card>(CARDS).insert_one(card).await?;
        Ok(result.into())
    }

    async fn list_cards(&self, user_email: &str) -> StoreResult<Vec<Card>> {
        self.find_all(CARDS, doc! { "user_email": user_email }, None).await
    }

    async fn find_card(&self, id: ObjectId) -> StoreResult<Option<Card>> {
        Ok(self.collection::<Card>(CARDS).find_one(doc! { "_id": id }).await?)
    }

    async fn delete_card(&self, id: ObjectId) -> StoreResult<DeleteSummary> {
        let result = self.collection::<Card>(CARDS).delete_one(doc! { "_id": id }).await?;
        Ok(result.into())
    }

    async fn list_payments(&self, email: &str) -> StoreResult<Vec<Payment>> {
        self.find_all(PAYMENTS, doc! { "email": email }, Some(doc! { "date": -1 }))
            .await
    }

    async fn checkout(
        &self,
        payment: &Payment,
        card_id: ObjectId,
        class: &ClassTarget,
    ) -> StoreResult<CheckoutReceipt> {
        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;

        match self.checkout_in_session(&mut session, payment, card_id, class).await {
            Ok(receipt) => {
                session.commit_transaction().await?;
                Ok(receipt)
            }
            Err(e) => {
                if let Err(abort_err) = session.abort_transaction().await {
                    log::warn!("⚠️  Failed to abort checkout transaction: {}", abort_err);
                }
                Err(e)
            }
        }
    }
}

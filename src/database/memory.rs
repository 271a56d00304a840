//! In-process `Store` used by the handler tests.
//!
//! Mirrors the MongoDB semantics the routes rely on: upsert by email,
//! `$setOnInsert` defaults, sell_count sorting and an all-or-nothing checkout.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::{Mutex, MutexGuard};

use super::{
    CheckoutReceipt, ClassTarget, DeleteSummary, InsertSummary, ListOrder, Store, StoreError,
    StoreResult, UpdateSummary,
};
use crate::models::{Card, Class, Payment, Role, User, UserProfile};

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    classes: Vec<Class>,
    cards: Vec<Card>,
    payments: Vec<Payment>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
    /// Number of write operations that reached the store
    writes: Mutex<usize>,
}

fn sort_popular<T>(items: &mut [T], key: impl Fn(&T) -> i64) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

fn inserted(id: ObjectId) -> InsertSummary {
    InsertSummary {
        acknowledged: true,
        inserted_id: id.to_hex(),
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Collections> {
        self.inner.lock().unwrap()
    }

    fn record_write(&self) {
        *self.writes.lock().unwrap() += 1;
    }

    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }

    pub fn seed_user(&self, mut user: User) -> ObjectId {
        let id = user.id.unwrap_or_else(ObjectId::new);
        user.id = Some(id);
        self.lock().users.push(user);
        id
    }

    pub fn seed_class(&self, mut class: Class) -> ObjectId {
        let id = class.id.unwrap_or_else(ObjectId::new);
        class.id = Some(id);
        self.lock().classes.push(class);
        id
    }

    pub fn seed_card(&self, mut card: Card) -> ObjectId {
        let id = card.id.unwrap_or_else(ObjectId::new);
        card.id = Some(id);
        self.lock().cards.push(card);
        id
    }

    pub fn seed_payment(&self, mut payment: Payment) -> ObjectId {
        let id = payment.id.unwrap_or_else(ObjectId::new);
        payment.id = Some(id);
        self.lock().payments.push(payment);
        id
    }

    pub fn users(&self) -> Vec<User> {
        self.lock().users.clone()
    }

    pub fn classes(&self) -> Vec<Class> {
        self.lock().classes.clone()
    }

    pub fn cards(&self) -> Vec<Card> {
        self.lock().cards.clone()
    }

    pub fn payments(&self) -> Vec<Payment> {
        self.lock().payments.clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn upsert_user(&self, email: &str, profile: &UserProfile) -> StoreResult<UpdateSummary> {
        self.record_write();
        let mut data = self.lock();

        if let Some(user) = data.users.iter_mut().find(|u| u.email == email) {
            let before = (
                user.name.clone(),
                user.photo.clone(),
                user.phone.clone(),
                user.address.clone(),
                user.gender.clone(),
            );
            if profile.name.is_some() {
                user.name = profile.name.clone();
            }
            if profile.photo.is_some() {
                user.photo = profile.photo.clone();
            }
            if profile.phone.is_some() {
                user.phone = profile.phone.clone();
            }
            if profile.address.is_some() {
                user.address = profile.address.clone();
            }
            if profile.gender.is_some() {
                user.gender = profile.gender.clone();
            }
            let after = (
                user.name.clone(),
                user.photo.clone(),
                user.phone.clone(),
                user.address.clone(),
                user.gender.clone(),
            );
            return Ok(UpdateSummary {
                acknowledged: true,
                matched_count: 1,
                modified_count: u64::from(before != after),
                upserted_id: None,
            });
        }

        let id = ObjectId::new();
        data.users.push(User {
            id: Some(id),
            email: email.to_string(),
            name: profile.name.clone(),
            photo: profile.photo.clone(),
            phone: profile.phone.clone(),
            address: profile.address.clone(),
            gender: profile.gender.clone(),
            role: Some(Role::Student),
            sell_count: 0,
        });

        Ok(UpdateSummary {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_id: Some(id.to_hex()),
        })
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.lock().users.clone())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_instructors(&self, order: ListOrder) -> StoreResult<Vec<User>> {
        let mut instructors: Vec<User> = self
            .lock()
            .users
            .iter()
            .filter(|u| u.role == Some(Role::Instructor))
            .cloned()
            .collect();
        if order == ListOrder::Popular {
            sort_popular(&mut instructors, |u| u.sell_count);
        }
        Ok(instructors)
    }

    async fn set_user_role(&self, id: ObjectId, role: Role) -> StoreResult<UpdateSummary> {
        self.record_write();
        let mut data = self.lock();
        let mut summary = UpdateSummary {
            acknowledged: true,
            ..Default::default()
        };
        if let Some(user) = data.users.iter_mut().find(|u| u.id == Some(id)) {
            summary.matched_count = 1;
            if user.role != Some(role) {
                user.role = Some(role);
                summary.modified_count = 1;
            }
        }
        Ok(summary)
    }

    async fn delete_user(&self, id: ObjectId) -> StoreResult<DeleteSummary> {
        self.record_write();
        let mut data = self.lock();
        let before = data.users.len();
        data.users.retain(|u| u.id != Some(id));
        Ok(DeleteSummary {
            acknowledged: true,
            deleted_count: (before - data.users.len()) as u64,
        })
    }

    async fn insert_class(&self, class: &Class) -> StoreResult<InsertSummary> {
        self.record_write();
        let id = ObjectId::new();
        let mut class = class.clone();
        class.id = Some(id);
        self.lock().classes.push(class);
        Ok(inserted(id))
    }

    async fn list_classes(&self, order: ListOrder) -> StoreResult<Vec<Class>> {
        let mut classes = self.lock().classes.clone();
        if order == ListOrder::Popular {
            sort_popular(&mut classes, |c| c.sell_count);
        }
        Ok(classes)
    }

    async fn insert_card(&self, card: &Card) -> StoreResult<InsertSummary> {
        self.record_write();
        let id = ObjectId::new();
        let mut card = card.clone();
        card.id = Some(id);
        self.lock().cards.push(card);
        Ok(inserted(id))
    }

    async fn list_cards(&self, user_email: &str) -> StoreResult<Vec<Card>> {
        Ok(self
            .lock()
            .cards
            .iter()
            .filter(|c| c.user_email == user_email)
            .cloned()
            .collect())
    }

    async fn find_card(&self, id: ObjectId) -> StoreResult<Option<Card>> {
        Ok(self.lock().cards.iter().find(|c| c.id == Some(id)).cloned())
    }

    async fn delete_card(&self, id: ObjectId) -> StoreResult<DeleteSummary> {
        self.record_write();
        let mut data = self.lock();
        let before = data.cards.len();
        data.cards.retain(|c| c.id != Some(id));
        Ok(DeleteSummary {
            acknowledged: true,
            deleted_count: (before - data.cards.len()) as u64,
        })
    }

    async fn list_payments(&self, email: &str) -> StoreResult<Vec<Payment>> {
        let mut payments: Vec<Payment> = self
            .lock()
            .payments
            .iter()
            .filter(|p| p.email == email)
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.date.timestamp_millis().cmp(&a.date.timestamp_millis()));
        Ok(payments)
    }

    async fn checkout(
        &self,
        payment: &Payment,
        card_id: ObjectId,
        class: &ClassTarget,
    ) -> StoreResult<CheckoutReceipt> {
        self.record_write();
        let mut data = self.lock();

        // Validate everything first so a rejection leaves the collections untouched
        let class_idx = data
            .classes
            .iter()
            .position(|c| match class {
                ClassTarget::Id(id) => c.id == Some(*id),
                ClassTarget::FirstOwnedBy(email) => &c.instructor_email == email,
            })
            .filter(|&idx| data.classes[idx].available_seats > 0)
            .ok_or(StoreError::SeatsExhausted)?;

        let card_idx = data
            .cards
            .iter()
            .position(|c| c.id == Some(card_id))
            .ok_or(StoreError::CardNotFound)?;

        let class_doc = &mut data.classes[class_idx];
        class_doc.available_seats -= 1;
        class_doc.sell_count += 1;

        let payment_id = ObjectId::new();
        let mut stored = payment.clone();
        stored.id = Some(payment_id);
        data.payments.push(stored);

        data.cards.remove(card_idx);

        let instructor_idx = data
            .users
            .iter()
            .position(|u| u.email == payment.instructor_email);

        let instructor_result = match instructor_idx {
            Some(idx) => {
                data.users[idx].sell_count += 1;
                UpdateSummary {
                    acknowledged: true,
                    matched_count: 1,
                    modified_count: 1,
                    upserted_id: None,
                }
            }
            None => {
                let id = ObjectId::new();
                data.users.push(User {
                    id: Some(id),
                    email: payment.instructor_email.clone(),
                    name: None,
                    photo: None,
                    phone: None,
                    address: None,
                    gender: None,
                    role: None,
                    sell_count: 1,
                });
                UpdateSummary {
                    acknowledged: true,
                    matched_count: 0,
                    modified_count: 0,
                    upserted_id: Some(id.to_hex()),
                }
            }
        };

        Ok(CheckoutReceipt {
            insert_result: inserted(payment_id),
            delete_result: DeleteSummary {
                acknowledged: true,
                deleted_count: 1,
            },
            class_result: UpdateSummary {
                acknowledged: true,
                matched_count: 1,
                modified_count: 1,
                upserted_id: None,
            },
            instructor_result,
        })
    }
}

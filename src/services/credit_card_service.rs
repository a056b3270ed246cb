use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::database::models::{CreditCard, NewCreditCard};
use crate::database::repository::CreditCardRepository;
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::owned_by;

/// Card details as submitted by the owner
#[derive(Debug, Clone)]
pub struct CardInput {
    pub card_name: String,
    pub total_limit: f64,
    /// Defaults to the total limit
    pub current_limit: Option<f64>,
    pub due_date: i32,
}

pub struct CreditCardService {
    cards: Arc<dyn CreditCardRepository>,
}

impl CreditCardService {
    pub fn new(cards: Arc<dyn CreditCardRepository>) -> Self {
        Self { cards }
    }

    pub async fn list(&self, user_id: Uuid) -> ServiceResult<Vec<CreditCard>> {
        Ok(self.cards.list_by_user(user_id).await?)
    }

    pub async fn get(&self, id: Uuid, user_id: Uuid) -> ServiceResult<CreditCard> {
        owned_by(self.cards.find_by_id(id).await?, user_id, "credit card")
    }

    pub async fn create(&self, user_id: Uuid, input: CardInput) -> ServiceResult<CreditCard> {
        let card = validate(user_id, input)?;
        let card = self.cards.insert(card).await?;
        info!("Created credit card {} for user {}", card.id, user_id);
        Ok(card)
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> ServiceResult<()> {
        let card = self.get(id, user_id).await?;
        self.cards.delete(card.id).await?;
        Ok(())
    }
}

fn validate(user_id: Uuid, input: CardInput) -> ServiceResult<NewCreditCard> {
    let card_name = input.card_name.trim().to_string();
    if card_name.is_empty() {
        return Err(ServiceError::validation("card_name", "card name must not be empty"));
    }
    if !input.total_limit.is_finite() || input.total_limit < 0.0 {
        return Err(ServiceError::validation(
            "total_limit",
            "total limit must be zero or greater",
        ));
    }
    let current_limit = input.current_limit.unwrap_or(input.total_limit);
    if !current_limit.is_finite() || current_limit < 0.0 {
        return Err(ServiceError::validation(
            "current_limit",
            "current limit must be zero or greater",
        ));
    }
    if current_limit > input.total_limit {
        return Err(ServiceError::validation(
            "current_limit",
            "current limit cannot exceed the total limit",
        ));
    }
    if !(1..=31).contains(&input.due_date) {
        return Err(ServiceError::validation(
            "due_date",
            "due date must be a day of the month between 1 and 31",
        ));
    }

    Ok(NewCreditCard {
        user_id,
        card_name,
        total_limit: input.total_limit,
        current_limit,
        due_date: input.due_date,
    })
}

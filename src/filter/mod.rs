pub mod error;
pub mod types;

pub use error::FilterError;
pub use types::*;

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::config::FilterConfig;
use crate::database::models::Frequency;

/// Raw list query string shared by the three expense kinds. Parameters that
/// do not apply to a kind are ignored when converting.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseQuery {
    pub category_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub card_id: Option<Uuid>,
    pub frequency: Option<Frequency>,
    pub installments_number: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ExpenseQuery {
    pub fn into_simple(self, config: &FilterConfig) -> Result<SimpleExpenseFilters, FilterError> {
        Ok(SimpleExpenseFilters {
            base: self.base(config)?,
        })
    }

    pub fn into_recurring(self, config: &FilterConfig) -> Result<RecurringExpenseFilters, FilterError> {
        Ok(RecurringExpenseFilters {
            base: self.base(config)?,
            card_id: self.card_id,
            frequency: self.frequency,
        })
    }

    pub fn into_credit_card(
        self,
        config: &FilterConfig,
    ) -> Result<CreditCardExpenseFilters, FilterError> {
        Ok(CreditCardExpenseFilters {
            base: self.base(config)?,
            card_id: self.card_id,
            installments_number: self.installments_number,
        })
    }

    fn base(&self, config: &FilterConfig) -> Result<ExpenseFilters, FilterError> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(FilterError::InvalidDateRange {
                    start: start.to_string(),
                    end: end.to_string(),
                });
            }
        }
        for amount in [self.min_amount, self.max_amount].into_iter().flatten() {
            if !amount.is_finite() {
                return Err(FilterError::InvalidAmount(amount.to_string()));
            }
        }
        if let (Some(min), Some(max)) = (self.min_amount, self.max_amount) {
            if min > max {
                return Err(FilterError::InvalidAmountRange { min, max });
            }
        }

        Ok(ExpenseFilters {
            category_id: self.category_id,
            start_date: self.start_date,
            end_date: self.end_date,
            min_amount: self.min_amount,
            max_amount: self.max_amount,
            page: page(self.limit, self.offset, config)?,
        })
    }
}

fn page(limit: Option<i64>, offset: Option<i64>, config: &FilterConfig) -> Result<Page, FilterError> {
    if let Some(off) = offset {
        if off < 0 {
            return Err(FilterError::InvalidOffset("Offset must be non-negative".to_string()));
        }
    }
    let limit = match limit {
        Some(l) if l < 0 => {
            return Err(FilterError::InvalidLimit("Limit must be non-negative".to_string()))
        }
        Some(l) => {
            // Apply max limit from config
            let max_limit = config.max_limit.unwrap_or(i64::MAX);
            if l > max_limit {
                tracing::warn!("Limit {} exceeds max {}, capping to max", l, max_limit);
                Some(max_limit)
            } else {
                Some(l)
            }
        }
        None => None,
    };
    Ok(Page { limit, offset })
}

/// `?start_date=&end_date=` for the summary endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl SummaryQuery {
    pub fn into_range(self) -> Result<DateRange, FilterError> {
        let start = self.start_date.ok_or(FilterError::MissingParameter("start_date"))?;
        let end = self.end_date.ok_or(FilterError::MissingParameter("end_date"))?;
        if start > end {
            return Err(FilterError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(DateRange { start, end })
    }
}

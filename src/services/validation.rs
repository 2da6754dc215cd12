//! Field checks shared by the spending and subscription forms.

use crate::entities::{PaymentMethod, bank_account_entity as banks};
use crate::error::{AppError, AppResult};
use sea_orm::{ConnectionTrait, EntityTrait};

/// Trimmed, non-empty text.
pub fn require_text(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

pub fn require_positive_pkr(amount_pkr: f64) -> AppResult<()> {
    if !amount_pkr.is_finite() || amount_pkr <= 0.0 {
        return Err(AppError::ValidationError(
            "Amount - PKR must be greater than 0".into(),
        ));
    }
    Ok(())
}

pub fn check_optional_usd(amount_usd: Option<f64>) -> AppResult<()> {
    if let Some(usd) = amount_usd
        && (!usd.is_finite() || usd < 0.0)
    {
        return Err(AppError::ValidationError(
            "Amount - USD must be a non-negative number".into(),
        ));
    }
    Ok(())
}

/// Bank account to store for a payment. Cash never links an account; Online
/// and IBFT must reference an existing one.
pub async fn resolve_bank_account<C: ConnectionTrait>(
    db: &C,
    method: PaymentMethod,
    bank_account_id: Option<i32>,
) -> AppResult<Option<i32>> {
    if !method.requires_bank_account() {
        return Ok(None);
    }
    let id = bank_account_id.ok_or_else(|| {
        AppError::ValidationError("Bank account is required for Online or IBFT payments".into())
    })?;
    if banks::Entity::find_by_id(id).one(db).await?.is_none() {
        return Err(AppError::ValidationError(format!(
            "Bank account {id} does not exist"
        )));
    }
    Ok(Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;

    #[test]
    fn test_require_text_trims() {
        assert_eq!(require_text("Title", "  Netflix ").unwrap(), "Netflix");
        assert!(matches!(
            require_text("Title", "   "),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_amount_checks() {
        assert!(require_positive_pkr(1500.0).is_ok());
        assert!(require_positive_pkr(0.0).is_err());
        assert!(require_positive_pkr(f64::NAN).is_err());
        assert!(check_optional_usd(None).is_ok());
        assert!(check_optional_usd(Some(4.99)).is_ok());
        assert!(check_optional_usd(Some(-1.0)).is_err());
    }

    #[tokio::test]
    async fn test_cash_drops_bank_account() {
        let db = test_pool().await;
        let resolved = resolve_bank_account(&db, PaymentMethod::Cash, Some(1))
            .await
            .unwrap();
        assert_eq!(resolved, None);
    }

    #[tokio::test]
    async fn test_online_requires_existing_bank_account() {
        let db = test_pool().await;
        assert!(
            resolve_bank_account(&db, PaymentMethod::Online, None)
                .await
                .is_err()
        );
        assert!(
            resolve_bank_account(&db, PaymentMethod::Ibft, Some(9999))
                .await
                .is_err()
        );
        // seeded accounts start at id 1
        assert_eq!(
            resolve_bank_account(&db, PaymentMethod::Ibft, Some(1))
                .await
                .unwrap(),
            Some(1)
        );
    }
}

//! Payment method management
//!
//! At most one method carries the default-selection flag; requesting it on
//! create or update atomically moves the flag. A method referenced by any
//! reservation cannot be deleted, only deactivated.

use std::sync::Arc;

use chrono::Utc;

use crate::audit::UserContext;
use crate::common::{ServiceError, ServiceResult};
use crate::db::PaymentMethodRepository;
use crate::models::{PaymentMethod, PaymentMethodStatus};

#[derive(Debug, Clone)]
pub struct PaymentMethodInput {
    pub name: String,
    pub commission_rate: f64,
    pub require_unpaid_amount_check: bool,
    pub is_default_select: bool,
    pub status: PaymentMethodStatus,
}

#[derive(Clone)]
pub struct PaymentMethodService {
    payment_methods: Arc<dyn PaymentMethodRepository>,
}

impl PaymentMethodService {
    pub fn new(payment_methods: Arc<dyn PaymentMethodRepository>) -> Self {
        Self { payment_methods }
    }

    pub async fn create(
        &self,
        _actor: &UserContext,
        input: PaymentMethodInput,
    ) -> ServiceResult<PaymentMethod> {
        self.validate(&input, None).await?;

        let now = Utc::now();
        let method = PaymentMethod {
            id: 0,
            name: input.name,
            commission_rate: input.commission_rate,
            require_unpaid_amount_check: input.require_unpaid_amount_check,
            is_default_select: false,
            status: input.status,
            created_at: now,
            updated_at: now,
        };
        let mut created = self.payment_methods.create(method).await?;

        if input.is_default_select {
            self.payment_methods.make_default(created.id).await?;
            created.is_default_select = true;
        }
        Ok(created)
    }

    pub async fn update(
        &self,
        _actor: &UserContext,
        id: u64,
        input: PaymentMethodInput,
    ) -> ServiceResult<PaymentMethod> {
        let existing = self
            .payment_methods
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::PaymentMethodNotFound)?;
        self.validate(&input, Some(id)).await?;

        let gained_default = input.is_default_select && !existing.is_default_select;

        let mut updated = existing;
        updated.name = input.name;
        updated.commission_rate = input.commission_rate;
        updated.require_unpaid_amount_check = input.require_unpaid_amount_check;
        updated.status = input.status;

        let mut stored = self.payment_methods.update(updated).await?;
        if gained_default {
            self.payment_methods.make_default(id).await?;
            stored.is_default_select = true;
        }
        Ok(stored)
    }

    /// Refused while any reservation references the method, including
    /// cancelled ones; the trail and old bookings must keep resolving
    pub async fn delete(&self, _actor: &UserContext, id: u64) -> ServiceResult<()> {
        if self.payment_methods.find_by_id(id).await?.is_none() {
            return Err(ServiceError::PaymentMethodNotFound);
        }
        if self.payment_methods.referenced_by_reservations(id).await? {
            return Err(ServiceError::PaymentMethodInUse);
        }
        Ok(self.payment_methods.delete(id).await?)
    }

    pub async fn get(&self, id: u64) -> ServiceResult<PaymentMethod> {
        self.payment_methods
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::PaymentMethodNotFound)
    }

    pub async fn list(&self, page: usize, size: usize) -> ServiceResult<(Vec<PaymentMethod>, u64)> {
        Ok(self.payment_methods.find_all(page, size).await?)
    }

    /// Active methods only, for booking forms
    pub async fn list_active(&self) -> ServiceResult<Vec<PaymentMethod>> {
        Ok(self.payment_methods.find_active().await?)
    }

    async fn validate(
        &self,
        input: &PaymentMethodInput,
        exclude_id: Option<u64>,
    ) -> ServiceResult<()> {
        if input.name.trim().is_empty() {
            return Err(ServiceError::Validation("method name must not be empty".into()));
        }
        if !(0.0..=1.0).contains(&input.commission_rate) {
            return Err(ServiceError::Validation(
                "commission rate must be between 0 and 1".into(),
            ));
        }
        if self
            .payment_methods
            .exists_by_name(&input.name, exclude_id)
            .await?
        {
            return Err(ServiceError::PaymentMethodNameExists);
        }
        Ok(())
    }
}

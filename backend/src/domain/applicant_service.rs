//! Applicant mutation pipeline.
//!
//! Every command runs the same stages: stateless validation, then a unit of
//! work holding the stateful checks and the write, then an audit event. A
//! unit of work is committed only when every stage succeeds; any failure
//! after `begin` rolls it back.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{debug, warn};

use crate::domain::ports::{
    ApplicantAuditLog, ApplicantCommand, ApplicantFilter, ApplicantRepository,
    ApplicantRepositoryError, ApplicantUnitOfWork, CountryDirectory, CountryVerdict,
};
use crate::domain::security::{
    is_sql_injection_attempt, is_xss_attempt, sanitize_input,
};
use crate::domain::validation::{
    ADDRESS_ADMITTED, ApplicantField, NAME_ADMITTED, ValidationPath, normalize_email,
    phone_length_within_bounds, screen, validate_address, validate_age, validate_applied_date,
    validate_country, validate_distinct_names, validate_email, validate_name, validate_phone,
};
use crate::domain::{
    Applicant, ApplicantError, ApplicantFields, ApplicantId, AuditEvent, AuditOperation,
    CreateApplicant, DEFAULT_DELETION_REASON, DeleteApplicant, NewApplicant, RowVersion,
    SYSTEM_ACTOR, UpdateApplicant, ValidationPolicy, check_concurrency,
};

/// Message returned when the presented token is stale.
pub const CONFLICT_MESSAGE: &str =
    "The applicant has been modified by another user. Please refresh and try again.";

/// Longest accepted deletion reason, in characters.
pub const MAX_DELETION_REASON_LENGTH: usize = 500;

fn store_failure(error: ApplicantRepositoryError) -> ApplicantError {
    match error {
        ApplicantRepositoryError::RevisionMismatch { .. } => ApplicantError::conflict(CONFLICT_MESSAGE),
        other => ApplicantError::system(other.to_string()),
    }
}

fn duplicate_email(email: &str) -> ApplicantError {
    ApplicantError::business(format!(
        "An applicant with email address '{email}' already exists."
    ))
}

/// [`store_failure`] for writes of `email`, where the store itself may
/// reject a duplicate that raced past [`ApplicantService::ensure_unique_email`].
fn write_failure(error: ApplicantRepositoryError, email: &str) -> ApplicantError {
    match error {
        ApplicantRepositoryError::DuplicateEmail => duplicate_email(email),
        other => store_failure(other),
    }
}

/// Either the value a stage produced or the fact that the target is gone.
enum Located<T> {
    Found(T),
    Absent,
}

/// Applicant service implementing the [`ApplicantCommand`] driving port.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use applicant_backend::domain::ApplicantService;
/// use applicant_backend::domain::ports::FixtureCountryDirectory;
/// use applicant_backend::outbound::audit::TracingAuditLog;
/// use applicant_backend::outbound::memory::InMemoryApplicantRepository;
/// use mockable::DefaultClock;
///
/// let service = ApplicantService::new(
///     Arc::new(InMemoryApplicantRepository::default()),
///     Arc::new(FixtureCountryDirectory),
///     Arc::new(TracingAuditLog),
///     Arc::new(DefaultClock),
/// );
/// # let _ = service;
/// ```
pub struct ApplicantService<R: ?Sized, C: ?Sized, A: ?Sized> {
    repository: Arc<R>,
    countries: Arc<C>,
    audit: Arc<A>,
    clock: Arc<dyn Clock>,
    policy: ValidationPolicy,
}

impl<R: ?Sized, C: ?Sized, A: ?Sized> Clone for ApplicantService<R, C, A> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            countries: Arc::clone(&self.countries),
            audit: Arc::clone(&self.audit),
            clock: Arc::clone(&self.clock),
            policy: self.policy,
        }
    }
}

impl<R: ?Sized, C: ?Sized, A: ?Sized> ApplicantService<R, C, A> {
    /// Create a service with the default [`ValidationPolicy`].
    pub fn new(repository: Arc<R>, countries: Arc<C>, audit: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            countries,
            audit,
            clock,
            policy: ValidationPolicy::default(),
        }
    }

    /// Replace the validation policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Active validation policy.
    #[must_use]
    pub const fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }
}

impl<R, C, A> ApplicantService<R, C, A>
where
    R: ApplicantRepository + ?Sized,
    C: CountryDirectory + ?Sized,
    A: ApplicantAuditLog + ?Sized,
{
    fn reject(&self, operation: AuditOperation, id: Option<i64>, error: ApplicantError) -> ApplicantError {
        self.audit
            .record(&AuditEvent::for_failure(operation, id, &error));
        error
    }

    async fn finish<T: Send>(
        unit: Box<dyn ApplicantUnitOfWork>,
        outcome: Result<T, ApplicantError>,
    ) -> Result<T, ApplicantError> {
        match outcome {
            Ok(value) => {
                unit.commit().await.map_err(store_failure)?;
                Ok(value)
            }
            Err(error) => {
                if let Err(rollback_error) = unit.rollback().await {
                    warn!(error = %rollback_error, "applicant transaction rollback failed");
                }
                Err(error)
            }
        }
    }

    async fn check_country(&self, country: &str) -> Result<(), ApplicantError> {
        let verdict = self.countries.verify(country).await;
        debug!(country, ?verdict, "country directory verdict");
        let policy = self.policy.country;
        match verdict {
            CountryVerdict::Unrecognised if policy.reject_unrecognised => Err(
                ApplicantError::validation(
                    ApplicantField::CountryOfOrigin.as_str(),
                    "Country must be a valid country name",
                ),
            ),
            CountryVerdict::Unknown if policy.reject_unknown => Err(ApplicantError::validation(
                ApplicantField::CountryOfOrigin.as_str(),
                "Country of origin could not be verified",
            )),
            _ => Ok(()),
        }
    }

    fn check_business_age(&self, age: i32) -> Result<(), ApplicantError> {
        let bounds = self.policy.business_age;
        if bounds.contains(age) {
            return Ok(());
        }
        Err(ApplicantError::business(format!(
            "Applicant age must be between {} and {} years.",
            bounds.min(),
            bounds.max()
        )))
    }

    fn check_business_rules(
        &self,
        fields: &ApplicantFields,
        now: DateTime<Utc>,
        check_phone: bool,
    ) -> Result<(), ApplicantError> {
        self.check_business_age(fields.age)?;
        if fields.applied_date > now {
            return Err(ApplicantError::business("Applied date cannot be in the future."));
        }
        if check_phone && !phone_length_within_bounds(&fields.phone) {
            return Err(ApplicantError::business(
                "Phone number must be between 7 and 15 digits.",
            ));
        }
        Ok(())
    }

    async fn ensure_unique_email(
        unit: &mut dyn ApplicantUnitOfWork,
        email: &str,
        exclude_id: Option<ApplicantId>,
    ) -> Result<(), ApplicantError> {
        let filter = ApplicantFilter::default().with_email(email, exclude_id);
        let clashes = unit.count_matching(&filter).await.map_err(store_failure)?;
        if clashes > 0 {
            return Err(duplicate_email(email));
        }
        Ok(())
    }

    async fn run_create(&self, fields: ApplicantFields) -> Result<Applicant, ApplicantError> {
        let now = self.clock.utc();
        validate_fields(&fields, ValidationPath::Create)?;
        validate_age(fields.age, self.policy.schema_age)?;
        self.check_country(&fields.country_of_origin).await?;

        let mut unit = self.repository.begin().await.map_err(store_failure)?;
        let outcome = self.create_within(unit.as_mut(), fields, now).await;
        Self::finish(unit, outcome).await
    }

    async fn create_within(
        &self,
        unit: &mut dyn ApplicantUnitOfWork,
        fields: ApplicantFields,
        now: DateTime<Utc>,
    ) -> Result<Applicant, ApplicantError> {
        let email = sanitize_input(&normalize_email(&fields.email_address));
        Self::ensure_unique_email(unit, &email, None).await?;
        self.check_business_rules(&fields, now, true)?;

        let record = NewApplicant {
            name: sanitize_input(&fields.name),
            family_name: sanitize_input(&fields.family_name),
            address: sanitize_input(&fields.address),
            email_address: email.clone(),
            phone: sanitize_input(&fields.phone),
            age: fields.age,
            country_of_origin: sanitize_input(&fields.country_of_origin),
            applied_date: fields.applied_date,
            hired: fields.hired,
            created_date: now,
            created_by: SYSTEM_ACTOR.to_owned(),
            last_modified_date: now,
            last_modified_by: SYSTEM_ACTOR.to_owned(),
        };
        unit.insert(record)
            .await
            .map_err(|error| write_failure(error, &email))
    }

    async fn run_update(&self, command: UpdateApplicant) -> Result<Option<Applicant>, ApplicantError> {
        let now = self.clock.utc();
        let id = command_id(command.id, "Invalid applicant ID")?;
        ensure_token_not_empty(command.row_version.as_ref())?;
        validate_fields(&command.fields, ValidationPath::Update)?;
        validate_distinct_names(&command.fields.name, &command.fields.family_name)?;

        let mut unit = self.repository.begin().await.map_err(store_failure)?;
        let outcome = self.update_within(unit.as_mut(), id, command, now).await;
        match Self::finish(unit, outcome).await? {
            Located::Found(record) => Ok(Some(record)),
            Located::Absent => Ok(None),
        }
    }

    async fn update_within(
        &self,
        unit: &mut dyn ApplicantUnitOfWork,
        id: ApplicantId,
        command: UpdateApplicant,
        now: DateTime<Utc>,
    ) -> Result<Located<Applicant>, ApplicantError> {
        let Some(mut record) = find_live(unit, id).await? else {
            return Ok(Located::Absent);
        };
        ensure_current(command.row_version.as_ref(), record.row_version.as_ref())?;

        let fields = command.fields;
        validate_age(fields.age, self.policy.business_age)?;
        validate_applied_date(fields.applied_date, now)?;
        let email = sanitize_input(&normalize_email(&fields.email_address));
        Self::ensure_unique_email(unit, &email, Some(id)).await?;
        self.check_business_rules(&fields, now, false)?;

        record.name = sanitize_input(&fields.name);
        record.family_name = sanitize_input(&fields.family_name);
        record.address = sanitize_input(&fields.address);
        record.email_address = email.clone();
        record.phone = sanitize_input(&fields.phone);
        record.age = fields.age;
        record.country_of_origin = sanitize_input(&fields.country_of_origin);
        record.applied_date = fields.applied_date;
        record.hired = fields.hired;
        record.touch(SYSTEM_ACTOR, now);

        match unit.update(&record).await {
            Ok(updated) => Ok(Located::Found(updated)),
            Err(ApplicantRepositoryError::NotFound { .. }) => Ok(Located::Absent),
            Err(error) => Err(write_failure(error, &email)),
        }
    }

    async fn run_delete(&self, command: DeleteApplicant) -> Result<Option<AuditEvent>, ApplicantError> {
        let now = self.clock.utc();
        let id = command_id(command.id, "Invalid applicant ID for deletion")?;
        ensure_token_not_empty(command.row_version.as_ref())?;
        let reason = validate_deletion_reason(command.reason.as_deref(), command.hard_delete)?;

        let mut unit = self.repository.begin().await.map_err(store_failure)?;
        let outcome = delete_within(unit.as_mut(), id, &command, reason, now).await;
        match Self::finish(unit, outcome).await? {
            Located::Found(event) => Ok(Some(event)),
            Located::Absent => Ok(None),
        }
    }
}

async fn delete_within(
    unit: &mut dyn ApplicantUnitOfWork,
    id: ApplicantId,
    command: &DeleteApplicant,
    reason: Option<String>,
    now: DateTime<Utc>,
) -> Result<Located<AuditEvent>, ApplicantError> {
    let Some(mut record) = find_live(unit, id).await? else {
        return Ok(Located::Absent);
    };
    ensure_current(command.row_version.as_ref(), record.row_version.as_ref())?;

    let outcome = if command.hard_delete {
        unit.delete(&record).await.map(|()| reason)
    } else {
        let stored = reason.unwrap_or_else(|| DEFAULT_DELETION_REASON.to_owned());
        record.soft_delete(stored.clone(), SYSTEM_ACTOR, now);
        unit.update(&record).await.map(|_| Some(stored))
    };
    match outcome {
        Ok(reason) => Ok(Located::Found(AuditEvent::RecordDeleted {
            id,
            hard: command.hard_delete,
            reason,
            actor: SYSTEM_ACTOR.to_owned(),
        })),
        Err(ApplicantRepositoryError::NotFound { .. }) => Ok(Located::Absent),
        Err(error) => Err(store_failure(error)),
    }
}

async fn find_live(
    unit: &mut dyn ApplicantUnitOfWork,
    id: ApplicantId,
) -> Result<Option<Applicant>, ApplicantError> {
    let found = unit.find_by_id(id).await.map_err(store_failure)?;
    Ok(found.filter(|record| !record.is_deleted))
}

fn command_id(raw: i64, message: &str) -> Result<ApplicantId, ApplicantError> {
    ApplicantId::new(raw).map_err(|_| ApplicantError::validation(ApplicantField::Id.as_str(), message))
}

fn ensure_token_not_empty(token: Option<&RowVersion>) -> Result<(), ApplicantError> {
    if token.is_some_and(RowVersion::is_empty) {
        return Err(ApplicantError::validation(
            ApplicantField::RowVersion.as_str(),
            "Row version cannot be empty",
        ));
    }
    Ok(())
}

fn ensure_current(
    presented: Option<&RowVersion>,
    stored: Option<&RowVersion>,
) -> Result<(), ApplicantError> {
    check_concurrency(presented, stored).map_err(|mismatch| {
        debug!(
            presented = %mismatch.presented,
            stored = %mismatch.stored,
            "row version mismatch"
        );
        ApplicantError::conflict(CONFLICT_MESSAGE)
    })
}

fn validate_deletion_reason(
    reason: Option<&str>,
    hard_delete: bool,
) -> Result<Option<String>, ApplicantError> {
    let field = ApplicantField::Reason.as_str();
    let reason = reason.filter(|text| !text.trim().is_empty());
    let Some(text) = reason else {
        if hard_delete {
            return Err(ApplicantError::validation(
                field,
                "Reason is required for hard delete operations",
            ));
        }
        return Ok(None);
    };
    if text.chars().count() > MAX_DELETION_REASON_LENGTH {
        return Err(ApplicantError::validation(
            field,
            format!(
                "Deletion reason exceeds maximum length of {MAX_DELETION_REASON_LENGTH} characters"
            ),
        ));
    }
    if is_sql_injection_attempt(text) {
        return Err(ApplicantError::security(
            "Potential SQL injection detected in deletion reason",
        ));
    }
    if is_xss_attempt(text) {
        return Err(ApplicantError::security(
            "Potential XSS attack detected in deletion reason",
        ));
    }
    Ok(Some(sanitize_input(text)))
}

/// Screen every text field, then apply the per-field rules.
///
/// The screening pass runs across all fields first so an injection payload
/// anywhere in the command is reported as a security rejection.
fn validate_fields(fields: &ApplicantFields, path: ValidationPath) -> Result<(), ApplicantError> {
    screen(ApplicantField::Name, &fields.name, &NAME_ADMITTED, path)?;
    screen(ApplicantField::FamilyName, &fields.family_name, &NAME_ADMITTED, path)?;
    screen(ApplicantField::EmailAddress, &fields.email_address, &[], path)?;
    screen(ApplicantField::Address, &fields.address, &ADDRESS_ADMITTED, path)?;
    screen(ApplicantField::Phone, &fields.phone, &[], path)?;
    screen(ApplicantField::CountryOfOrigin, &fields.country_of_origin, &NAME_ADMITTED, path)?;

    validate_name(ApplicantField::Name, &fields.name, path)?;
    validate_name(ApplicantField::FamilyName, &fields.family_name, path)?;
    validate_email(&fields.email_address, path)?;
    validate_address(&fields.address, path)?;
    validate_phone(&fields.phone, path)?;
    validate_country(&fields.country_of_origin, path)?;
    Ok(())
}

#[async_trait]
impl<R, C, A> ApplicantCommand for ApplicantService<R, C, A>
where
    R: ApplicantRepository + ?Sized,
    C: CountryDirectory + ?Sized,
    A: ApplicantAuditLog + ?Sized,
{
    async fn create(&self, command: CreateApplicant) -> Result<ApplicantId, ApplicantError> {
        let created = self
            .run_create(command.fields)
            .await
            .map_err(|error| self.reject(AuditOperation::Create, None, error))?;
        self.audit.record(&AuditEvent::RecordCreated {
            id: created.id,
            actor: SYSTEM_ACTOR.to_owned(),
        });
        Ok(created.id)
    }

    async fn update(&self, command: UpdateApplicant) -> Result<bool, ApplicantError> {
        let id = command.id;
        let updated = self
            .run_update(command)
            .await
            .map_err(|error| self.reject(AuditOperation::Update, Some(id), error))?;
        let Some(record) = updated else {
            debug!(id, "update target absent");
            return Ok(false);
        };
        self.audit.record(&AuditEvent::RecordUpdated {
            id: record.id,
            actor: SYSTEM_ACTOR.to_owned(),
        });
        Ok(true)
    }

    async fn delete(&self, command: DeleteApplicant) -> Result<bool, ApplicantError> {
        let id = command.id;
        let deleted = self
            .run_delete(command)
            .await
            .map_err(|error| self.reject(AuditOperation::Delete, Some(id), error))?;
        let Some(event) = deleted else {
            debug!(id, "delete target absent");
            return Ok(false);
        };
        self.audit.record(&event);
        Ok(true)
    }
}

#[cfg(test)]
#[path = "applicant_service_tests.rs"]
mod tests;

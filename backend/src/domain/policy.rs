//! Tunable validation policy for the mutation pipeline.
//!
//! Two age bounds coexist on purpose. The create-command schema and the entity
//! constraint historically allowed 20 to 60, while the business rule applied
//! on create and update allows 18 to 65. Both are kept and both can be
//! configured until a product decision settles on one.

/// Inclusive age range.
///
/// # Examples
/// ```
/// use applicant_backend::domain::AgeBounds;
///
/// let bounds = AgeBounds::new(18, 65).expect("ordered bounds");
/// assert!(bounds.contains(18));
/// assert!(!bounds.contains(66));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeBounds {
    min: i32,
    max: i32,
}

/// Raised when the lower bound exceeds the upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("age bounds are inverted: {min} > {max}")]
pub struct InvalidAgeBounds {
    /// Requested lower bound.
    pub min: i32,
    /// Requested upper bound.
    pub max: i32,
}

impl AgeBounds {
    /// Entity and create-schema bound.
    pub const SCHEMA_DEFAULT: Self = Self { min: 20, max: 60 };
    /// Business-rule bound applied on create and update.
    pub const BUSINESS_DEFAULT: Self = Self { min: 18, max: 65 };

    /// Build an inclusive range.
    ///
    /// # Errors
    /// Returns [`InvalidAgeBounds`] when `min > max`.
    pub const fn new(min: i32, max: i32) -> Result<Self, InvalidAgeBounds> {
        if min > max {
            Err(InvalidAgeBounds { min, max })
        } else {
            Ok(Self { min, max })
        }
    }

    /// Lower bound.
    #[must_use]
    pub const fn min(self) -> i32 {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub const fn max(self) -> i32 {
        self.max
    }

    /// Whether `age` lies inside the range.
    #[must_use]
    pub const fn contains(self, age: i32) -> bool {
        age >= self.min && age <= self.max
    }
}

/// How the pipeline reacts to country directory verdicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryPolicy {
    /// Reject names the directory positively does not know.
    pub reject_unrecognised: bool,
    /// Reject names when the directory could not answer.
    pub reject_unknown: bool,
}

impl Default for CountryPolicy {
    fn default() -> Self {
        Self {
            reject_unrecognised: true,
            reject_unknown: false,
        }
    }
}

/// Validation settings consumed by [`ApplicantService`](crate::domain::ApplicantService).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Bound enforced by the create-command schema.
    pub schema_age: AgeBounds,
    /// Bound enforced by the business rule on create and update.
    pub business_age: AgeBounds,
    /// Country directory handling.
    pub country: CountryPolicy,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            schema_age: AgeBounds::SCHEMA_DEFAULT,
            business_age: AgeBounds::BUSINESS_DEFAULT,
            country: CountryPolicy::default(),
        }
    }
}

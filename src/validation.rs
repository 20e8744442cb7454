//! Payload validation.
//!
//! Create and update models implement [`Validatable`]; the endpoint façade
//! runs validation before delegating to the lifecycle service, and failures
//! surface as a 400 listing each invalid field with the constraints it
//! violated.
//!
//! ```rust,ignore
//! impl Validatable for PersonCreate {
//!     fn validate(&self) -> Result<(), Violations> {
//!         let mut violations = Violations::new();
//!         if self.name.is_empty() {
//!             violations.add("name", "name must not be empty");
//!         }
//!         if self.age < 0 {
//!             violations.add("age", "age must not be negative");
//!         }
//!         violations.result()
//!     }
//! }
//! ```

use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

/// One invalid field and the list of constraints it violated.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConstraintViolation {
    pub property: String,
    pub constraints: Vec<String>,
}

impl ConstraintViolation {
    #[must_use]
    pub fn new(property: impl Into<String>, constraints: Vec<String>) -> Self {
        Self { property: property.into(), constraints }
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property, self.constraints.join(", "))
    }
}

/// Collector grouping constraint messages per field.
#[derive(Debug, Clone, Default)]
pub struct Violations {
    violations: Vec<ConstraintViolation>,
}

impl Violations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violated constraint, grouping by field.
    pub fn add(&mut self, property: impl Into<String>, constraint: impl Into<String>) {
        let property = property.into();
        let constraint = constraint.into();
        if let Some(existing) = self
            .violations
            .iter_mut()
            .find(|violation| violation.property == property)
        {
            existing.constraints.push(constraint);
        } else {
            self.violations.push(ConstraintViolation::new(property, vec![constraint]));
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<ConstraintViolation> {
        self.violations
    }

    /// Convert the collector into a `Result`, erring when anything was added.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one violation was recorded.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed with {} violation(s):", self.violations.len())?;
        for violation in &self.violations {
            write!(f, "\n  - {violation}")?;
        }
        Ok(())
    }
}

/// Implemented by create/update payloads. The default accepts everything, so
/// resources without constraints need no impl body.
pub trait Validatable {
    /// # Errors
    ///
    /// Returns the collected [`Violations`] when the payload is invalid.
    fn validate(&self) -> Result<(), Violations> {
        Ok(())
    }
}

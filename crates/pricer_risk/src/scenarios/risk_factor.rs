//! Risk factor identification for sensitivity analysis.
//!
//! This module provides [`RiskFactorId`], an enum for uniquely identifying
//! risk factors such as underlying assets, yield curves, and volatility surfaces.
//!
//! # Requirements
//!
//! - Requirement 1.3: Risk factor identification for Greeks aggregation.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unique identifier for a risk factor.
///
/// Used to categorise and aggregate Greeks by their underlying risk drivers.
/// Each variant represents a different type of market risk factor.
///
/// # Examples
///
/// ```rust
/// use pricer_risk::scenarios::RiskFactorId;
///
/// let underlying = RiskFactorId::Underlying("SPX".to_string());
/// let curve = RiskFactorId::Curve("USD-OIS".to_string());
/// let vol = RiskFactorId::VolSurface("SPX-Vol".to_string());
///
/// // Display formatting
/// assert_eq!(format!("{}", underlying), "Underlying:SPX");
/// assert_eq!(format!("{}", curve), "Curve:USD-OIS");
/// assert_eq!(format!("{}", vol), "VolSurface:SPX-Vol");
/// ```
///
/// # Requirements
///
/// - Requirement 1.3: Risk factor identification for Greeks aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RiskFactorId {
    /// Underlying asset identifier (e.g., "USDJPY", "SPX").
    ///
    /// Represents spot price risk factors such as equity indices,
    /// FX rates, or commodity prices.
    Underlying(String),

    /// Yield curve identifier (e.g., "USD-OIS", "JPY-LIBOR").
    ///
    /// Represents interest rate risk factors from discount or
    /// projection curves.
    Curve(String),

    /// Volatility surface identifier (e.g., "SPX-Vol", "USDJPY-Vol").
    ///
    /// Represents implied volatility risk factors from option markets.
    VolSurface(String),
}

impl RiskFactorId {
    /// Creates a new underlying risk factor.
    ///
    /// # Arguments
    ///
    /// * `name` - The underlying asset name (e.g., "SPX", "USDJPY").
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pricer_risk::scenarios::RiskFactorId;
    ///
    /// let factor = RiskFactorId::underlying("SPX");
    /// assert_eq!(factor, RiskFactorId::Underlying("SPX".to_string()));
    /// ```
    #[inline]
    pub fn underlying(name: impl Into<String>) -> Self {
        Self::Underlying(name.into())
    }

    /// Creates a new curve risk factor.
    ///
    /// # Arguments
    ///
    /// * `name` - The curve name (e.g., "USD-OIS", "EUR-EURIBOR").
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pricer_risk::scenarios::RiskFactorId;
    ///
    /// let factor = RiskFactorId::curve("USD-OIS");
    /// assert_eq!(factor, RiskFactorId::Curve("USD-OIS".to_string()));
    /// ```
    #[inline]
    pub fn curve(name: impl Into<String>) -> Self {
        Self::Curve(name.into())
    }

    /// Creates a new volatility surface risk factor.
    ///
    /// # Arguments
    ///
    /// * `name` - The volatility surface name (e.g., "SPX-Vol").
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pricer_risk::scenarios::RiskFactorId;
    ///
    /// let factor = RiskFactorId::vol_surface("SPX-Vol");
    /// assert_eq!(factor, RiskFactorId::VolSurface("SPX-Vol".to_string()));
    /// ```
    #[inline]
    pub fn vol_surface(name: impl Into<String>) -> Self {
        Self::VolSurface(name.into())
    }

    /// Returns the risk factor type as a string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pricer_risk::scenarios::RiskFactorId;
    ///
    /// assert_eq!(RiskFactorId::underlying("SPX").factor_type(), "Underlying");
    /// assert_eq!(RiskFactorId::curve("USD-OIS").factor_type(), "Curve");
    /// assert_eq!(RiskFactorId::vol_surface("SPX-Vol").factor_type(), "VolSurface");
    /// ```
    #[inline]
    pub fn factor_type(&self) -> &'static str {
        match self {
            Self::Underlying(_) => "Underlying",
            Self::Curve(_) => "Curve",
            Self::VolSurface(_) => "VolSurface",
        }
    }

    /// Returns the risk factor name (identifier string).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pricer_risk::scenarios::RiskFactorId;
    ///
    /// assert_eq!(RiskFactorId::underlying("SPX").name(), "SPX");
    /// assert_eq!(RiskFactorId::curve("USD-OIS").name(), "USD-OIS");
    /// ```
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            Self::Underlying(name) | Self::Curve(name) | Self::VolSurface(name) => name,
        }
    }

    /// Returns true if this is an underlying risk factor.
    #[inline]
    pub fn is_underlying(&self) -> bool {
        matches!(self, Self::Underlying(_))
    }

    /// Returns true if this is a curve risk factor.
    #[inline]
    pub fn is_curve(&self) -> bool {
        matches!(self, Self::Curve(_))
    }

    /// Returns true if this is a volatility surface risk factor.
    #[inline]
    pub fn is_vol_surface(&self) -> bool {
        matches!(self, Self::VolSurface(_))
    }
}

impl fmt::Display for RiskFactorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Underlying(name) => write!(f, "Underlying:{}", name),
            Self::Curve(name) => write!(f, "Curve:{}", name),
            Self::VolSurface(name) => write!(f, "VolSurface:{}", name),
        }
    }
}

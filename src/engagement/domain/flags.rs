//! Tagged bitset types for criteria audience and delivery channels.
//!
//! Both flag types are tested with exact AND-masking so combined or unknown
//! bits compose without special cases.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Audience bits routing a criteria to the patient or a staff track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssigneeFlags(u8);

impl AssigneeFlags {
    /// The patient themselves.
    pub const PATIENT: Self = Self(1);
    /// A health coach.
    pub const HEALTH_COACH: Self = Self(1 << 1);
    /// A care coordinator.
    pub const CARE_COORDINATOR: Self = Self(1 << 2);

    /// Creates a flag set from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` when every bit of `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` when `self` and `other` share at least one bit.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for AssigneeFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for AssigneeFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for AssigneeFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Display for AssigneeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Self::PATIENT, "patient"),
            (Self::HEALTH_COACH, "health_coach"),
            (Self::CARE_COORDINATOR, "care_coordinator"),
        ];
        write_flag_names(f, names.iter().filter(|(flag, _)| self.contains(*flag)))
    }
}

/// Delivery channel bits for an engagement criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelFlags(u8);

impl ChannelFlags {
    /// Shown on the patient or staff dashboard only.
    pub const DASHBOARD: Self = Self(1);
    /// Delivered as an SMS message.
    pub const SMS: Self = Self(1 << 1);
    /// Delivered as an email.
    pub const EMAIL: Self = Self(1 << 2);

    /// Creates a flag set from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` when every bit of `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` when `self` and `other` share at least one bit.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns `true` when the dashboard is the only delivery channel.
    ///
    /// Dashboard-only criteria bypass the notification eligibility oracle
    /// and are admitted directly in progress.
    #[must_use]
    pub const fn is_dashboard_only(self) -> bool {
        self.0 == Self::DASHBOARD.0
    }
}

impl BitOr for ChannelFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ChannelFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ChannelFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Display for ChannelFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Self::DASHBOARD, "dashboard"),
            (Self::SMS, "sms"),
            (Self::EMAIL, "email"),
        ];
        write_flag_names(f, names.iter().filter(|(flag, _)| self.contains(*flag)))
    }
}

/// Writes pipe-separated flag names, or `none` for an empty set.
fn write_flag_names<'a, F: 'a>(
    f: &mut fmt::Formatter<'_>,
    set_flags: impl Iterator<Item = &'a (F, &'static str)>,
) -> fmt::Result {
    let mut wrote_any = false;
    for (_, name) in set_flags {
        if wrote_any {
            write!(f, "|")?;
        }
        write!(f, "{name}")?;
        wrote_any = true;
    }
    if !wrote_any {
        write!(f, "none")?;
    }
    Ok(())
}

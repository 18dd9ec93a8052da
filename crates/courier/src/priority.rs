//! Message priority levels.

/// Priority of a message, levels 1 (highest) to 5 (lowest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    /// Level 1.
    Highest = 1,
    /// Level 2.
    High = 2,
    /// Level 3.
    Normal = 3,
    /// Level 4.
    Low = 4,
    /// Level 5.
    Lowest = 5,
}

impl Priority {
    /// Numeric level (1-5).
    #[must_use]
    pub const fn level(self) -> u8 {
        self as u8
    }

    /// Value of the `X-Priority` header.
    #[must_use]
    pub const fn x_priority(self) -> &'static str {
        match self {
            Self::Highest => "1 (Highest)",
            Self::High => "2 (High)",
            Self::Normal => "3 (Normal)",
            Self::Low => "4 (Low)",
            Self::Lowest => "5 (Lowest)",
        }
    }

    /// Value of the `X-MSMail-Priority` header.
    #[must_use]
    pub const fn ms_mail_priority(self) -> &'static str {
        match self {
            Self::Highest | Self::High => "High",
            Self::Normal => "Normal",
            Self::Low | Self::Lowest => "Low",
        }
    }

    /// Value of the `Importance` header.
    #[must_use]
    pub const fn importance(self) -> &'static str {
        self.ms_mail_priority()
    }

    /// The three priority headers, in emission order.
    #[must_use]
    pub const fn headers(self) -> [(&'static str, &'static str); 3] {
        [
            ("X-Priority", self.x_priority()),
            ("X-MSMail-Priority", self.ms_mail_priority()),
            ("Importance", self.importance()),
        ]
    }
}

impl TryFrom<i64> for Priority {
    type Error = i64;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Self::Highest),
            2 => Ok(Self::High),
            3 => Ok(Self::Normal),
            4 => Ok(Self::Low),
            5 => Ok(Self::Lowest),
            other => Err(other),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_table() {
        let expected = [
            (1, "1 (Highest)", "High", "High"),
            (2, "2 (High)", "High", "High"),
            (3, "3 (Normal)", "Normal", "Normal"),
            (4, "4 (Low)", "Low", "Low"),
            (5, "5 (Lowest)", "Low", "Low"),
        ];

        for (level, x_priority, ms_mail, importance) in expected {
            let priority = Priority::try_from(level).unwrap();
            assert_eq!(i64::from(priority.level()), level);
            assert_eq!(
                priority.headers(),
                [
                    ("X-Priority", x_priority),
                    ("X-MSMail-Priority", ms_mail),
                    ("Importance", importance),
                ]
            );
        }
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(Priority::try_from(0), Err(0));
        assert_eq!(Priority::try_from(6), Err(6));
        assert_eq!(Priority::try_from(-1), Err(-1));
    }
}

//! Bounded, wrapping numeric edit fields
//!
//! Every user-adjustable number in the menu is a counter with a fixed
//! inclusive range and step: stepping past the maximum wraps to the
//! minimum and stepping below the minimum wraps to the maximum.

/// Range and step of one editable field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FieldSpec {
    /// Smallest value (inclusive)
    pub min: i16,
    /// Largest value (inclusive)
    pub max: i16,
    /// Increment applied per button press
    pub step: i16,
}

impl FieldSpec {
    /// UTC offset hours, -12 to +14
    pub const OFFSET_HOURS: Self = Self { min: -12, max: 14, step: 1 };

    /// UTC offset minutes, quarter-hour steps
    pub const OFFSET_MINUTES: Self = Self { min: 0, max: 45, step: 15 };

    /// Alarm hour of day
    pub const ALARM_HOURS: Self = Self { min: 0, max: 23, step: 1 };

    /// Alarm minute
    pub const ALARM_MINUTES: Self = Self { min: 0, max: 59, step: 1 };

    /// One Up press: add the step, wrapping past the maximum
    pub fn up(&self, value: i16) -> i16 {
        let next = value + self.step;
        if next > self.max {
            self.min
        } else {
            next
        }
    }

    /// One Down press: subtract the step, wrapping below the minimum
    pub fn down(&self, value: i16) -> i16 {
        let next = value - self.step;
        if next < self.min {
            self.max
        } else {
            next
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_offset_hours_wrap() {
        assert_eq!(FieldSpec::OFFSET_HOURS.up(14), -12);
        assert_eq!(FieldSpec::OFFSET_HOURS.down(-12), 14);
        assert_eq!(FieldSpec::OFFSET_HOURS.up(0), 1);
        assert_eq!(FieldSpec::OFFSET_HOURS.down(0), -1);
    }

    #[test]
    fn test_offset_hours_full_cycle() {
        // The range -12..=14 holds 27 values, so 27 presses come back to
        // the start and one more lands on 1
        let mut value = 0;
        for _ in 0..27 {
            value = FieldSpec::OFFSET_HOURS.up(value);
        }
        assert_eq!(value, 0);
        assert_eq!(FieldSpec::OFFSET_HOURS.up(value), 1);
    }

    #[test]
    fn test_offset_minutes_wrap() {
        assert_eq!(FieldSpec::OFFSET_MINUTES.up(0), 15);
        assert_eq!(FieldSpec::OFFSET_MINUTES.up(45), 0);
        assert_eq!(FieldSpec::OFFSET_MINUTES.down(0), 45);
        assert_eq!(FieldSpec::OFFSET_MINUTES.down(15), 0);
    }

    #[test]
    fn test_alarm_hours_wrap() {
        assert_eq!(FieldSpec::ALARM_HOURS.up(23), 0);
        assert_eq!(FieldSpec::ALARM_HOURS.down(0), 23);
    }

    #[test]
    fn test_alarm_minutes_wrap() {
        assert_eq!(FieldSpec::ALARM_MINUTES.up(59), 0);
        assert_eq!(FieldSpec::ALARM_MINUTES.down(0), 59);
    }

    fn specs() -> [FieldSpec; 4] {
        [
            FieldSpec::OFFSET_HOURS,
            FieldSpec::OFFSET_MINUTES,
            FieldSpec::ALARM_HOURS,
            FieldSpec::ALARM_MINUTES,
        ]
    }

    proptest! {
        #[test]
        fn prop_steps_stay_in_range(which in 0usize..4, presses in 0usize..200, start_up in proptest::bool::ANY) {
            let spec = specs()[which];
            let mut value = spec.min;
            for _ in 0..presses {
                value = if start_up { spec.up(value) } else { spec.down(value) };
                prop_assert!(value >= spec.min && value <= spec.max);
            }
        }

        #[test]
        fn prop_up_then_down_is_identity(which in 0usize..4, offset in 0i16..60) {
            let spec = specs()[which];
            let value = spec.min + (offset % (spec.max - spec.min + 1));
            // Only aligned values occur in practice; keep the step grid
            let value = value - (value - spec.min) % spec.step;
            prop_assert_eq!(spec.down(spec.up(value)), value);
        }
    }
}

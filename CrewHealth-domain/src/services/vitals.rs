//! Vitals assessment: field validation, temperature conversion, blood
//! pressure categorization and risk tiering.
//!
//! Everything here is pure and synchronous. The form controller, the record
//! service and the HTTP layer all call into this module so the thresholds
//! live in exactly one place.

use tracing::debug;

use crate::entities::vitals::{
    AssessmentSummary, BloodPressureCategory, ParsedValue, RiskTier, TemperatureUnit,
    ValidationResult, VitalField, VitalsForm, VitalsReading, BLOOD_PRESSURE_KEY,
};

/// Message used for any out-of-range pressure value
pub const BLOOD_PRESSURE_RANGE_MESSAGE: &str = "Blood pressure must be between 70-200 / 40-130 mmHg";

/// Validate every field of a form against its range for the active unit.
///
/// Returns an empty result when the form may be submitted.
pub fn validate(form: &VitalsForm, unit: TemperatureUnit) -> ValidationResult {
    let mut result = ValidationResult::new();

    for field in VitalField::ALL {
        if let Some(message) = check_field(field, form.parsed(field), unit) {
            result.add(field.error_key(), message);
        }
    }

    if !result.is_valid() {
        debug!("Vitals validation failed: {}", result);
    }

    result
}

/// Validate an already-numeric reading using its own temperature unit
pub fn validate_reading(reading: &VitalsReading) -> ValidationResult {
    let mut result = ValidationResult::new();

    for field in VitalField::ALL {
        let parsed = match reading.value(field) {
            Some(value) if value.is_finite() => ParsedValue::Number(value),
            Some(_) => ParsedValue::Invalid,
            None => ParsedValue::Blank,
        };
        if let Some(message) = check_field(field, parsed, reading.temperature_unit) {
            result.add(field.error_key(), message);
        }
    }

    result
}

fn check_field(field: VitalField, parsed: ParsedValue, unit: TemperatureUnit) -> Option<String> {
    match parsed {
        ParsedValue::Blank if field.is_required() => Some(format!("{} is required", field.label())),
        ParsedValue::Blank => None,
        ParsedValue::Invalid => Some(format!("{} must be a number", field.label())),
        ParsedValue::Number(value) => {
            let (min, max) = field.range(unit);
            if value >= min && value <= max {
                None
            } else if field.error_key() == BLOOD_PRESSURE_KEY {
                Some(BLOOD_PRESSURE_RANGE_MESSAGE.to_string())
            } else {
                Some(format!(
                    "{} must be between {} and {} {}",
                    field.label(),
                    min,
                    max,
                    field.unit_suffix(unit)
                ))
            }
        }
    }
}

/// Convert a temperature between units, rounded to one decimal place
pub fn convert_temperature(value: f64, from: TemperatureUnit, to: TemperatureUnit) -> f64 {
    round_one_decimal(convert_exact(value, from, to))
}

fn convert_exact(value: f64, from: TemperatureUnit, to: TemperatureUnit) -> f64 {
    match (from, to) {
        (TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit) => value * 9.0 / 5.0 + 32.0,
        (TemperatureUnit::Fahrenheit, TemperatureUnit::Celsius) => (value - 32.0) * 5.0 / 9.0,
        _ => value,
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Categorize a blood pressure pair. `None` when either value is missing or zero.
pub fn classify_blood_pressure(systolic: Option<f64>, diastolic: Option<f64>) -> Option<BloodPressureCategory> {
    let (systolic, diastolic) = match (systolic, diastolic) {
        (Some(s), Some(d)) if s != 0.0 && d != 0.0 => (s, d),
        _ => return None,
    };

    let category = if systolic >= 180.0 || diastolic >= 120.0 {
        BloodPressureCategory::HypertensiveCrisis
    } else if systolic >= 140.0 || diastolic >= 90.0 {
        BloodPressureCategory::Hypertension2
    } else if systolic >= 130.0 || diastolic >= 80.0 {
        BloodPressureCategory::Hypertension1
    } else if systolic >= 120.0 {
        BloodPressureCategory::Elevated
    } else {
        BloodPressureCategory::Normal
    };

    Some(category)
}

/// Risk tier of a reading.
///
/// Blood pressure contributes only through `bp_category`; absent fields are
/// ignored. Temperature thresholds are compared in Celsius on the unrounded value.
pub fn classify_risk(reading: &VitalsReading, bp_category: Option<BloodPressureCategory>) -> RiskTier {
    let temperature = reading
        .temperature
        .map(|t| convert_exact(t, reading.temperature_unit, TemperatureUnit::Celsius));

    let outside = |value: Option<f64>, low: f64, high: f64| value.map_or(false, |v| v < low || v > high);
    let below = |value: Option<f64>, low: f64| value.map_or(false, |v| v < low);

    let high = outside(temperature, 35.5, 38.5)
        || below(reading.oxygen_saturation, 94.0)
        || outside(reading.respiratory_rate, 12.0, 24.0)
        || outside(reading.heart_rate, 50.0, 110.0)
        || matches!(
            bp_category,
            Some(BloodPressureCategory::Hypertension2 | BloodPressureCategory::HypertensiveCrisis)
        );
    if high {
        return RiskTier::High;
    }

    let moderate = outside(temperature, 36.0, 37.8)
        || below(reading.oxygen_saturation, 96.0)
        || outside(reading.respiratory_rate, 14.0, 20.0)
        || outside(reading.heart_rate, 55.0, 100.0)
        || matches!(
            bp_category,
            Some(BloodPressureCategory::Hypertension1 | BloodPressureCategory::Elevated)
        );
    if moderate {
        return RiskTier::Moderate;
    }

    RiskTier::Low
}

/// Categorize the reading's blood pressure and tier its risk
pub fn assess(reading: &VitalsReading) -> AssessmentSummary {
    let category = classify_blood_pressure(reading.systolic, reading.diastolic);

    AssessmentSummary {
        blood_pressure_category: category,
        blood_pressure_label: category.map(|c| c.label().to_string()),
        risk_tier: classify_risk(reading, category),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normal_form() -> VitalsForm {
        let mut form = VitalsForm::default();
        form.set(VitalField::Temperature, "37.0");
        form.set(VitalField::HeartRate, "72");
        form.set(VitalField::Systolic, "120");
        form.set(VitalField::Diastolic, "80");
        form.set(VitalField::OxygenSaturation, "98");
        form.set(VitalField::RespiratoryRate, "16");
        form
    }

    fn normal_reading() -> VitalsReading {
        normal_form().reading(TemperatureUnit::Celsius)
    }

    #[test]
    fn test_normal_form_is_valid() {
        let result = validate(&normal_form(), TemperatureUnit::Celsius);
        assert!(result.is_valid(), "unexpected errors: {}", result);
    }

    #[test]
    fn test_absent_optional_fields_produce_no_failure() {
        let mut form = normal_form();
        form.set(VitalField::WeightKg, "  ");
        form.set(VitalField::SleepHours, "");
        assert!(validate(&form, TemperatureUnit::Celsius).is_valid());
    }

    #[test]
    fn test_required_fields_reported() {
        let result = validate(&VitalsForm::default(), TemperatureUnit::Celsius);
        assert_eq!(result.get("temperature"), Some("Temperature is required"));
        assert_eq!(result.get("heart_rate"), Some("Heart rate is required"));
        assert_eq!(result.get(BLOOD_PRESSURE_KEY), Some("Blood pressure is required"));
        assert!(result.get("weight_kg").is_none());
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn test_heart_rate_lower_boundary() {
        let mut form = normal_form();
        form.set(VitalField::HeartRate, "39");
        let result = validate(&form, TemperatureUnit::Celsius);
        assert_eq!(
            result.get("heart_rate"),
            Some("Heart rate must be between 40 and 200 BPM")
        );

        form.set(VitalField::HeartRate, "40");
        assert!(validate(&form, TemperatureUnit::Celsius).is_valid());
    }

    #[test]
    fn test_temperature_boundaries_inclusive() {
        let mut form = normal_form();
        for (text, unit) in [
            ("35", TemperatureUnit::Celsius),
            ("42", TemperatureUnit::Celsius),
            ("95", TemperatureUnit::Fahrenheit),
            ("107.6", TemperatureUnit::Fahrenheit),
        ] {
            form.set(VitalField::Temperature, text);
            assert!(validate(&form, unit).is_valid(), "{} {} should pass", text, unit);
        }

        form.set(VitalField::Temperature, "34.9");
        assert_eq!(
            validate(&form, TemperatureUnit::Celsius).get("temperature"),
            Some("Temperature must be between 35 and 42 °C")
        );

        form.set(VitalField::Temperature, "107.7");
        assert_eq!(
            validate(&form, TemperatureUnit::Fahrenheit).get("temperature"),
            Some("Temperature must be between 95 and 107.6 °F")
        );

        // A Celsius value is out of range once the unit says Fahrenheit.
        form.set(VitalField::Temperature, "37");
        assert!(!validate(&form, TemperatureUnit::Fahrenheit).is_valid());
    }

    #[test]
    fn test_blood_pressure_shares_one_key() {
        let mut form = normal_form();
        form.set(VitalField::Systolic, "210");
        form.set(VitalField::Diastolic, "abc");

        let result = validate(&form, TemperatureUnit::Celsius);
        assert_eq!(result.len(), 1);
        assert_eq!(result.get(BLOOD_PRESSURE_KEY), Some(BLOOD_PRESSURE_RANGE_MESSAGE));
        assert!(result.has_error(VitalField::Diastolic));

        form.set(VitalField::Systolic, "120");
        let result = validate(&form, TemperatureUnit::Celsius);
        assert_eq!(result.get(BLOOD_PRESSURE_KEY), Some("Blood pressure must be a number"));
    }

    #[test]
    fn test_non_numeric_optional_field_fails() {
        let mut form = normal_form();
        form.set(VitalField::WaterLiters, "lots");
        form.set(VitalField::SleepHours, "25");

        let result = validate(&form, TemperatureUnit::Celsius);
        assert_eq!(result.get("water_liters"), Some("Water intake must be a number"));
        assert_eq!(result.get("sleep_hours"), Some("Sleep must be between 0 and 24 hours"));
    }

    #[test]
    fn test_validate_reading_matches_form_validation() {
        let mut reading = normal_reading();
        assert!(validate_reading(&reading).is_valid());

        reading.oxygen_saturation = Some(101.0);
        reading.heart_rate = None;
        let result = validate_reading(&reading);
        assert_eq!(
            result.get("oxygen_saturation"),
            Some("Oxygen saturation must be between 70 and 100 %")
        );
        assert_eq!(result.get("heart_rate"), Some("Heart rate is required"));

        reading.oxygen_saturation = Some(f64::NAN);
        assert_eq!(
            validate_reading(&reading).get("oxygen_saturation"),
            Some("Oxygen saturation must be a number")
        );
    }

    #[test]
    fn test_convert_temperature() {
        assert_eq!(convert_temperature(37.0, TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit), 98.6);
        assert_eq!(convert_temperature(98.6, TemperatureUnit::Fahrenheit, TemperatureUnit::Celsius), 37.0);
        assert_eq!(convert_temperature(36.66, TemperatureUnit::Celsius, TemperatureUnit::Celsius), 36.7);
    }

    #[test]
    fn test_convert_temperature_round_trip_within_tenth() {
        for unit in [TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit] {
            let (min, max) = VitalField::Temperature.range(unit);
            let mut t = min;
            while t <= max {
                let there = convert_temperature(t, unit, unit.other());
                let back = convert_temperature(there, unit.other(), unit);
                assert!((back - t).abs() <= 0.1 + 1e-9, "{} {} came back as {}", t, unit, back);
                t += 0.1;
            }
        }
    }

    #[test]
    fn test_classify_blood_pressure() {
        assert_eq!(
            classify_blood_pressure(Some(185.0), Some(90.0)),
            Some(BloodPressureCategory::HypertensiveCrisis)
        );
        assert_eq!(classify_blood_pressure(Some(118.0), Some(76.0)), Some(BloodPressureCategory::Normal));
        assert_eq!(classify_blood_pressure(Some(125.0), Some(78.0)), Some(BloodPressureCategory::Elevated));
        assert_eq!(
            classify_blood_pressure(Some(120.0), Some(80.0)),
            Some(BloodPressureCategory::Hypertension1)
        );
        assert_eq!(
            classify_blood_pressure(Some(135.0), Some(95.0)),
            Some(BloodPressureCategory::Hypertension2)
        );
        assert_eq!(classify_blood_pressure(None, Some(80.0)), None);
        assert_eq!(classify_blood_pressure(Some(0.0), Some(80.0)), None);
    }

    #[test]
    fn test_classify_risk_low_for_normal_vitals() {
        let reading = normal_reading();
        assert_eq!(classify_risk(&reading, None), RiskTier::Low);
        assert_eq!(classify_risk(&reading, Some(BloodPressureCategory::Normal)), RiskTier::Low);
    }

    #[test]
    fn test_assess_uses_derived_category() {
        let summary = assess(&normal_reading());
        assert_eq!(summary.blood_pressure_category, Some(BloodPressureCategory::Hypertension1));
        assert_eq!(summary.blood_pressure_label.as_deref(), Some("Hypertension stage 1"));
        assert_eq!(summary.risk_tier, RiskTier::Moderate);

        let mut reading = normal_reading();
        reading.systolic = Some(118.0);
        reading.diastolic = Some(76.0);
        assert_eq!(assess(&reading).risk_tier, RiskTier::Low);

        reading.diastolic = None;
        let summary = assess(&reading);
        assert_eq!(summary.blood_pressure_label, None);
        assert_eq!(summary.risk_tier, RiskTier::Low);
    }

    #[test]
    fn test_low_oxygen_is_high_risk() {
        let mut reading = normal_reading();
        reading.oxygen_saturation = Some(93.0);
        assert_eq!(classify_risk(&reading, Some(BloodPressureCategory::Normal)), RiskTier::High);

        reading.oxygen_saturation = Some(95.0);
        assert_eq!(classify_risk(&reading, None), RiskTier::Moderate);
    }

    #[test]
    fn test_risk_thresholds() {
        let mut reading = normal_reading();
        reading.heart_rate = Some(111.0);
        assert_eq!(classify_risk(&reading, None), RiskTier::High);
        reading.heart_rate = Some(101.0);
        assert_eq!(classify_risk(&reading, None), RiskTier::Moderate);
        reading.heart_rate = Some(100.0);
        assert_eq!(classify_risk(&reading, None), RiskTier::Low);

        reading.respiratory_rate = Some(11.0);
        assert_eq!(classify_risk(&reading, None), RiskTier::High);
        reading.respiratory_rate = Some(21.0);
        assert_eq!(classify_risk(&reading, None), RiskTier::Moderate);
        reading.respiratory_rate = Some(16.0);

        assert_eq!(
            classify_risk(&reading, Some(BloodPressureCategory::Elevated)),
            RiskTier::Moderate
        );
        assert_eq!(
            classify_risk(&reading, Some(BloodPressureCategory::HypertensiveCrisis)),
            RiskTier::High
        );
    }

    #[test]
    fn test_fahrenheit_temperature_compared_in_celsius() {
        let mut reading = normal_reading();
        reading.temperature_unit = TemperatureUnit::Fahrenheit;

        reading.temperature = Some(98.6);
        assert_eq!(classify_risk(&reading, None), RiskTier::Low);

        reading.temperature = Some(100.4); // 38.0 °C
        assert_eq!(classify_risk(&reading, None), RiskTier::Moderate);

        reading.temperature = Some(102.2); // 39.0 °C
        assert_eq!(classify_risk(&reading, None), RiskTier::High);
    }

    fn risk_with(update: impl FnOnce(&mut VitalsReading)) -> RiskTier {
        let mut reading = normal_reading();
        update(&mut reading);
        classify_risk(&reading, None)
    }

    #[test]
    fn test_celsius_temperature_boundaries_are_strict() {
        let cases = [
            (38.5, RiskTier::Moderate),
            (38.51, RiskTier::High),
            (38.54, RiskTier::High),
            (35.5, RiskTier::Moderate),
            (35.49, RiskTier::High),
            (35.46, RiskTier::High),
            (37.8, RiskTier::Low),
            (37.81, RiskTier::Moderate),
            (37.84, RiskTier::Moderate),
            (36.0, RiskTier::Low),
            (35.99, RiskTier::Moderate),
        ];
        for (celsius, expected) in cases {
            assert_eq!(risk_with(|r| r.temperature = Some(celsius)), expected, "{} C", celsius);
        }
    }

    #[test]
    fn test_fahrenheit_temperature_boundaries_use_unrounded_conversion() {
        // 101.32 F = 38.51 C, 95.87 F = 35.48 C, 100.06 F = 37.81 C, 96.78 F = 35.99 C
        let cases = [
            (101.32, RiskTier::High),
            (95.87, RiskTier::High),
            (100.06, RiskTier::Moderate),
            (96.78, RiskTier::Moderate),
            (100.0, RiskTier::Low),
            (97.0, RiskTier::Low),
        ];
        for (fahrenheit, expected) in cases {
            let tier = risk_with(|r| {
                r.temperature_unit = TemperatureUnit::Fahrenheit;
                r.temperature = Some(fahrenheit);
            });
            assert_eq!(tier, expected, "{} F", fahrenheit);
        }
    }

    #[test]
    fn test_exact_vital_boundaries() {
        let heart_rate = [
            (110.0, RiskTier::Moderate),
            (110.5, RiskTier::High),
            (50.0, RiskTier::Moderate),
            (49.5, RiskTier::High),
            (100.0, RiskTier::Low),
            (100.5, RiskTier::Moderate),
            (55.0, RiskTier::Low),
            (54.5, RiskTier::Moderate),
        ];
        for (value, expected) in heart_rate {
            assert_eq!(risk_with(|r| r.heart_rate = Some(value)), expected, "heart rate {}", value);
        }

        let respiratory_rate = [
            (24.0, RiskTier::Moderate),
            (24.5, RiskTier::High),
            (12.0, RiskTier::Moderate),
            (11.5, RiskTier::High),
            (20.0, RiskTier::Low),
            (20.5, RiskTier::Moderate),
            (14.0, RiskTier::Low),
            (13.5, RiskTier::Moderate),
        ];
        for (value, expected) in respiratory_rate {
            assert_eq!(risk_with(|r| r.respiratory_rate = Some(value)), expected, "respiratory rate {}", value);
        }

        let oxygen = [
            (94.0, RiskTier::Moderate),
            (93.5, RiskTier::High),
            (96.0, RiskTier::Low),
            (95.5, RiskTier::Moderate),
        ];
        for (value, expected) in oxygen {
            assert_eq!(risk_with(|r| r.oxygen_saturation = Some(value)), expected, "oxygen {}", value);
        }
    }

    #[test]
    fn test_absent_fields_excluded_from_risk() {
        let reading = VitalsReading::default();
        assert_eq!(classify_risk(&reading, None), RiskTier::Low);
    }
}

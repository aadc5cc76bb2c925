//! Compiled-in usermod dependency rules.

use super::rule::{CapabilityFlag, Rule, RuleEntry, RuleTable, Trigger};

/// Temperature source alternatives accepted by the PWM fan usermod.
const PWM_FAN_SENSORS: [&str; 2] = ["Temperature", "sht"];

/// Spellings accepted for the four line display usermod.
const FOUR_LINE_DISPLAY_ALIASES: [&str; 2] =
    ["four_line_display_ALT", "usermod_v2_four_line_display_ALT"];

impl RuleTable {
    /// The usermod rules shipped with the firmware.
    pub fn builtin() -> Self {
        [
            // The fan picks its sensor source; the first available one wins.
            RuleEntry::first_match(
                "PWM_fan",
                vec![
                    Rule::emit(
                        Trigger::module("Temperature"),
                        CapabilityFlag::from_static("USERMOD_DALLASTEMPERATURE"),
                    ),
                    Rule::emit(
                        Trigger::module("sht"),
                        CapabilityFlag::from_static("USERMOD_SHT"),
                    ),
                    Rule::reject(
                        Trigger::missing_prerequisite("PWM_fan", PWM_FAN_SENSORS),
                        "PWM_fan usermod requires Temperature or sht to be enabled",
                    ),
                ],
            ),
            RuleEntry::independent(
                "seven_segment_display_reloaded",
                Rule::emit(
                    Trigger::module("SN_Photoresistor"),
                    CapabilityFlag::from_static("USERMOD_SN_PHOTORESISTOR"),
                ),
            ),
            RuleEntry::independent(
                "seven_segment_display_reloaded",
                Rule::emit(
                    Trigger::module("BH1750_v2"),
                    CapabilityFlag::from_static("USERMOD_BH1750"),
                ),
            ),
            RuleEntry::independent(
                "usermod_v2_rotary_encoder_ui_ALT",
                Rule::emit(
                    Trigger::any_of(FOUR_LINE_DISPLAY_ALIASES),
                    CapabilityFlag::from_static("USERMOD_FOUR_LINE_DISPLAY"),
                ),
            ),
        ]
        .into_iter()
        .collect()
    }
}

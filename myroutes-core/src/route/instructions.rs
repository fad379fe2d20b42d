use std::borrow::Cow;

fn base_instruction(kind: &str) -> Option<&'static str> {
    Some(match kind {
        "turn" => "Turn",
        "new name" => "Continue",
        "depart" => "Head out",
        "arrive" => "Arrive at destination",
        "merge" => "Merge",
        "on ramp" => "Take the ramp",
        "off ramp" => "Take the exit",
        "fork" => "At the fork",
        "end of road" => "At the end of the road",
        "continue" => "Continue",
        "roundabout" => "Enter the roundabout",
        "rotary" => "Enter the rotary",
        _ => return None,
    })
}

fn modifier_instruction(modifier: &str) -> Option<&'static str> {
    Some(match modifier {
        "uturn" => "Make a U-turn",
        "sharp right" => "Turn sharp right",
        "right" => "Turn right",
        "slight right" => "Turn slight right",
        "straight" => "Go straight",
        "slight left" => "Turn slight left",
        "left" => "Turn left",
        "sharp left" => "Turn sharp left",
        _ => return None,
    })
}

/// Human readable instruction for a routing-engine maneuver.
///
/// `depart` and `arrive` ignore the modifier. Otherwise a recognised
/// modifier wins over the maneuver type; an unrecognised modifier on a
/// `turn` is spelled out after "Turn".
pub fn instruction_for(kind: &str, modifier: Option<&str>) -> Cow<'static, str> {
    match kind {
        "depart" => return Cow::Borrowed("Start your journey"),
        "arrive" => return Cow::Borrowed("Arrive at your destination"),
        _ => {}
    }

    if let Some(text) = modifier.and_then(modifier_instruction) {
        return Cow::Borrowed(text);
    }

    if kind == "turn"
        && let Some(modifier) = modifier.filter(|m| !m.is_empty())
    {
        return Cow::Owned(format!("Turn {modifier}"));
    }

    Cow::Borrowed(base_instruction(kind).unwrap_or("Continue"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depart_and_arrive_ignore_modifiers() {
        assert_eq!(instruction_for("depart", Some("left")), "Start your journey");
        assert_eq!(instruction_for("arrive", None), "Arrive at your destination");
        assert_eq!(
            instruction_for("arrive", Some("sharp right")),
            "Arrive at your destination"
        );
    }

    #[test]
    fn modifier_takes_precedence() {
        assert_eq!(instruction_for("turn", Some("sharp left")), "Turn sharp left");
        assert_eq!(instruction_for("fork", Some("slight right")), "Turn slight right");
        assert_eq!(instruction_for("continue", Some("uturn")), "Make a U-turn");
        assert_eq!(instruction_for("new name", Some("straight")), "Go straight");
    }

    #[test]
    fn bare_turn_falls_back_to_turn() {
        assert_eq!(instruction_for("turn", None), "Turn");
        assert_eq!(instruction_for("turn", Some("")), "Turn");
        assert_eq!(instruction_for("turn", Some("backwards")), "Turn backwards");
    }

    #[test]
    fn base_types_without_modifier() {
        assert_eq!(instruction_for("roundabout", None), "Enter the roundabout");
        assert_eq!(instruction_for("off ramp", None), "Take the exit");
        assert_eq!(instruction_for("end of road", None), "At the end of the road");
    }

    #[test]
    fn unknown_types_continue() {
        assert_eq!(instruction_for("notification", None), "Continue");
        assert_eq!(instruction_for("", None), "Continue");
        assert_eq!(instruction_for("exit rotary", Some("sideways")), "Continue");
    }
}

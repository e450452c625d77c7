//! Suggested follow-up questions for a briefing.

use crate::types::WeatherSnapshot;

/// Upper bound on suggestions, the free-form option included
pub const MAX_SUGGESTIONS: usize = 4;

const CONTEXTUAL_TARGET: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowUpSuggestion {
    pub id: &'static str,
    pub text: &'static str,
    /// Question sent to the narration model; empty for the free-form option
    pub prompt: String,
    pub emoji: &'static str,
}

impl FollowUpSuggestion {
    fn new(id: &'static str, text: &'static str, prompt: String, emoji: &'static str) -> Self {
        Self {
            id,
            text,
            prompt,
            emoji,
        }
    }
}

/// Weather-driven suggestions first, topped up with general ones, then a
/// free-form "Something else".
pub fn suggest_follow_ups(snapshot: &WeatherSnapshot, location: &str) -> Vec<FollowUpSuggestion> {
    let mut suggestions = Vec::with_capacity(MAX_SUGGESTIONS);
    let temperature = &snapshot.temperature;

    if snapshot.precipitation.max_chance > 40.0 {
        suggestions.push(FollowUpSuggestion::new(
            "umbrella",
            "Do I need an umbrella?",
            format!(
                "Based on the weather in {location}, should I bring an umbrella today? \
Give practical advice about rain likelihood and timing."
            ),
            "☂️",
        ));
    }

    if temperature.high > 25.0 || temperature.low < 5.0 {
        suggestions.push(FollowUpSuggestion::new(
            "clothing",
            "What should I wear?",
            format!(
                "Given the temperature range of {}°C to {}°C in {location}, \
what clothing would you recommend for today?",
                temperature.low, temperature.high
            ),
            "👕",
        ));
    }

    if snapshot.wind.max > 15.0 {
        suggestions.push(FollowUpSuggestion::new(
            "outdoor",
            "Good for outdoor activities?",
            format!(
                "With wind speeds up to {} km/h in {location}, is it suitable for outdoor \
activities like cycling, running, or picnics?",
                snapshot.wind.max
            ),
            "🚴",
        ));
    }

    let general = [
        FollowUpSuggestion::new(
            "tomorrow",
            "What about tomorrow?",
            format!(
                "Can you tell me what the weather might be like tomorrow in {location}? \
Any significant changes expected?"
            ),
            "📅",
        ),
        FollowUpSuggestion::new(
            "activities",
            "Best time for activities?",
            format!(
                "Based on today's weather in {location}, what's the best time of day for \
outdoor activities?"
            ),
            "⏰",
        ),
        FollowUpSuggestion::new(
            "comparison",
            "Compare to yesterday?",
            format!(
                "How does today's weather in {location} compare to typical weather for this \
time of year?"
            ),
            "📊",
        ),
    ];
    for suggestion in general {
        if suggestions.len() >= CONTEXTUAL_TARGET {
            break;
        }
        suggestions.push(suggestion);
    }

    suggestions.push(FollowUpSuggestion::new(
        "custom",
        "Something else",
        String::new(),
        "💬",
    ));
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::cache::tests::snapshot;

    fn ids(suggestions: &[FollowUpSuggestion]) -> Vec<&'static str> {
        suggestions.iter().map(|s| s.id).collect()
    }

    #[test]
    fn test_mild_day_gets_general_suggestions() {
        // 12°C now, high 16, low 10, 10% rain, 5 km/h wind
        let suggestions = suggest_follow_ups(&snapshot(12.0), "Norwich");
        assert_eq!(ids(&suggestions), vec!["tomorrow", "activities", "comparison", "custom"]);
        assert!(suggestions[0].prompt.contains("tomorrow in Norwich"));
        assert!(suggestions[3].prompt.is_empty());
    }

    #[test]
    fn test_wet_cold_windy_day() {
        let mut snap = snapshot(2.0);
        snap.precipitation.max_chance = 85.0;
        snap.wind.max = 30.0;

        let suggestions = suggest_follow_ups(&snap, "Glasgow");
        assert_eq!(ids(&suggestions), vec!["umbrella", "clothing", "outdoor", "custom"]);
        assert!(suggestions[1].prompt.contains("0°C to 6°C in Glasgow"));
        assert!(suggestions[2].prompt.contains("up to 30 km/h"));
    }

    #[test]
    fn test_one_contextual_suggestion_is_topped_up() {
        let mut snap = snapshot(28.0);
        snap.precipitation.max_chance = 0.0;

        let suggestions = suggest_follow_ups(&snap, "Malta");
        assert_eq!(ids(&suggestions), vec!["clothing", "tomorrow", "activities", "custom"]);
    }
}

//! services/api/src/adapters/meal_llm.rs
//!
//! This module contains the adapter for the meal-suggestion LLM.
//! It implements the `MealAdvisorService` port from the `core` crate.

const SYSTEM_INSTRUCTIONS: &str = r#"You are a travel nutrition assistant. You suggest ONE extra meal or snack for a traveller who still has calories left for the day.

Rules:
- The suggestion must be between 150 and 350 kcal.
- It must NEVER contain any of the listed allergens, not even as a minor ingredient.
- It must respect every listed dietary preference.
- Prefer a traditional dish of the destination that is NOT in the list of dishes the traveller already selected.

Respond with ONLY a JSON object, no markdown and no explanation, in exactly this shape:
{"title": "<dish name>", "reason": "<one short sentence>", "estimatedCalories": <integer>}"#;

const USER_INPUT_TEMPLATE: &str = r#"DESTINATION: {destination}
REMAINING CALORIES TODAY: {remaining} kcal
ALLERGIES: {allergies}
DIETARY PREFERENCES: {preferences}
ALREADY SELECTED DISHES: {selected}"#;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use regex::Regex;
use travel_nutrition_core::ports::{
    AdvisorSuggestion, MealAdvisorRequest, MealAdvisorService, PortError, PortResult,
};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `MealAdvisorService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiMealAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiMealAdapter {
    /// Creates a new `OpenAiMealAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    fn render_user_input(request: &MealAdvisorRequest) -> String {
        USER_INPUT_TEMPLATE
            .replace("{destination}", &request.destination)
            .replace("{remaining}", &request.remaining_calories.to_string())
            .replace("{allergies}", &list_or_none(&request.allergies))
            .replace("{preferences}", &list_or_none(&request.dietary_preferences))
            .replace("{selected}", &list_or_none(&request.already_selected_dish_names))
    }

    /// Pulls the first JSON object out of a reply, tolerating code fences or chatter.
    fn parse_suggestion(reply: &str) -> PortResult<AdvisorSuggestion> {
        let object_regex =
            Regex::new(r"(?s)\{.*\}").map_err(|e| PortError::Unexpected(e.to_string()))?;
        let json = object_regex
            .find(reply)
            .map(|m| m.as_str())
            .ok_or_else(|| PortError::Unexpected("Meal advisor reply had no JSON object.".to_string()))?;

        serde_json::from_str(json)
            .map_err(|e| PortError::Unexpected(format!("Meal advisor reply was not valid JSON: {}", e)))
    }
}

fn list_or_none(items: &[String]) -> String {
    let cleaned: Vec<&str> = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if cleaned.is_empty() {
        "none".to_string()
    } else {
        cleaned.join(", ")
    }
}

//=========================================================================================
// `MealAdvisorService` Trait Implementation
//=========================================================================================

#[async_trait]
impl MealAdvisorService for OpenAiMealAdapter {
    /// Asks the LLM for one extra meal that fits the remaining budget.
    async fn suggest_extra_meal(
        &self,
        request: &MealAdvisorRequest,
    ) -> PortResult<AdvisorSuggestion> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(Self::render_user_input(request))
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .temperature(0.7)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Unexpected("Meal advisor LLM response contained no text content.".to_string())
            })?;

        tracing::debug!("Meal advisor reply: {}", content);
        Self::parse_suggestion(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_plain_json_reply() {
        let suggestion = OpenAiMealAdapter::parse_suggestion(
            r#"{"title": "Onigiri", "reason": "Light and local", "estimatedCalories": 220}"#,
        )
        .unwrap();
        assert_eq!(suggestion.title.as_deref(), Some("Onigiri"));
        assert_eq!(suggestion.reason.as_deref(), Some("Light and local"));
        assert_eq!(suggestion.estimated_calories, Some(220));
    }

    #[test]
    fn parses_a_fenced_reply_with_string_calories() {
        let reply = "Sure!\n```json\n{\"title\": \"Pho\", \"estimatedCalories\": \"300 \"}\n```";
        let suggestion = OpenAiMealAdapter::parse_suggestion(reply).unwrap();
        assert_eq!(suggestion.title.as_deref(), Some("Pho"));
        assert!(suggestion.reason.is_none());
        assert_eq!(suggestion.estimated_calories, Some(300));
    }

    #[test]
    fn replies_without_json_are_errors() {
        let err = OpenAiMealAdapter::parse_suggestion("I recommend sushi.").unwrap_err();
        assert!(matches!(err, PortError::Unexpected(_)));
    }

    #[test]
    fn user_input_lists_constraints() {
        let input = OpenAiMealAdapter::render_user_input(&MealAdvisorRequest {
            destination: "Japan".to_string(),
            remaining_calories: 640,
            allergies: vec!["peanut".to_string(), "sesame".to_string()],
            dietary_preferences: Vec::new(),
            already_selected_dish_names: vec!["Ramen".to_string()],
        });
        assert!(input.contains("DESTINATION: Japan"));
        assert!(input.contains("640 kcal"));
        assert!(input.contains("ALLERGIES: peanut, sesame"));
        assert!(input.contains("DIETARY PREFERENCES: none"));
        assert!(input.contains("ALREADY SELECTED DISHES: Ramen"));
    }
}

pub mod meal_llm;
pub mod weather;

pub use meal_llm::OpenAiMealAdapter;
pub use weather::OpenMeteoWeatherAdapter;

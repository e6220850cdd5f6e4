//! LLM Provider implementations for Notewire.
//!
//! All providers implement the `notewire_core::Provider` trait.

pub mod yandexgpt;

pub use yandexgpt::YandexGptProvider;

//! Prompt Composer
//!
//! Turns the inventory and the caller's transcript into the single text
//! prompt sent to the language model.

use crate::inventory::InventoryItem;

/// Stands in for the history block on the first turn of a call.
pub const NO_HISTORY: &str = "This is the start of the conversation.";

/// Renders one inventory row as a descriptive line.
pub fn render_item(item: &InventoryItem) -> String {
    format!(
        "{} by {} ({}) - ${}, {} in stock, Rating: {}/5, Format: {}, Language: {}, Pages: {}, Discount: {}%, {}",
        item.name,
        item.author,
        item.genre,
        item.price,
        item.quantity_available,
        item.rating,
        item.format,
        item.language,
        item.pages,
        item.discount_percent,
        if item.is_bestseller { "Bestseller" } else { "Regular" },
    )
}

/// Builds the full prompt for one caller turn. Pure and deterministic.
pub fn compose_prompt(user_query: &str, inventory: &[InventoryItem], history: &[String]) -> String {
    let book_list = inventory
        .iter()
        .map(render_item)
        .collect::<Vec<_>>()
        .join("\n");

    let memory_context = if history.is_empty() {
        NO_HISTORY.to_string()
    } else {
        history.join("\n")
    };

    format!(
        "You are a friendly AI bookstore assistant. Your job is to provide quick and helpful answers about book availability, pricing, and stock.

Conversation history so far:
{memory_context}

Here is the current book inventory:
{book_list}

The user asked: \"{user_query}\"

Respond in a natural, conversational manner. Keep your answer concise, engaging, and helpful. Avoid repeating the user's question; just provide the relevant information clearly and warmly.
"
    )
}

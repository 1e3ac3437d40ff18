pub mod cart_items;
pub mod order_items;
pub mod orders;
pub mod profile;
pub mod saved_cards;

pub use cart_items::Entity as CartItems;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use profile::Entity as ProfileRow;
pub use saved_cards::Entity as SavedCards;

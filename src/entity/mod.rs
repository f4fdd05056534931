pub mod order_items;
pub mod orders;

pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;

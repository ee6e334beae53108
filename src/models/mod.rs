pub mod product;
pub mod role;
pub mod shipping_address;
pub mod user;

pub use product::{Product, ProductInput, ProductListing};
pub use role::{Role, RoleInput};
pub use shipping_address::{ShippingAddress, ShippingAddressInput, ShippingAddressListing};
pub use user::{User, UserInput, UserSummary};

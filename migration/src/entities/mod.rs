pub mod hit;
pub mod site;

pub use hit::Entity as HitEntity;
pub use site::Entity as SiteEntity;

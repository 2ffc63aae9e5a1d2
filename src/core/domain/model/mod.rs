pub mod capabilities;
pub mod harvester;
pub mod inventory;
pub mod migration_plan;
pub mod object_meta;
pub mod plan_request;
pub mod source;

pub mod editor;
pub mod ownership;
pub mod performance;
pub mod serializer;
pub mod store;
pub mod view;

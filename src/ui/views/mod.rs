mod entity_detail;
mod entity_list;

pub use entity_detail::EntityDetailView;
pub use entity_list::EntityListView;

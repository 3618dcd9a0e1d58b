//! CrudService: CRUD execution over the safe SQL builders.

mod crud;
pub use crud::CrudService;

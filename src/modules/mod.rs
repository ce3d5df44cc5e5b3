pub mod authors;
pub mod books;
pub mod copies;
pub mod genres;

use stacks_kernel::ModuleRegistry;

use crate::state::SharedCatalog;

/// Register all catalog modules with the registry.
pub fn register_all(registry: &mut ModuleRegistry, catalog: SharedCatalog) {
    registry.register(authors::create_module(catalog.clone()));
    registry.register(genres::create_module(catalog.clone()));
    registry.register(books::create_module(catalog.clone()));
    registry.register(copies::create_module(catalog));
}

pub mod build;
pub mod executor;
pub mod loader;
pub mod naming;
pub mod scanner;
pub mod target;

pub use build::BuildContext;
pub use executor::{ExecutorError, Gorename, RenameExecutor, RenameTool};
pub use loader::{Package, PackageLoader};
pub use naming::rename;
pub use scanner::DeclarationScanner;
pub use target::{RenameTarget, RenameTargets};

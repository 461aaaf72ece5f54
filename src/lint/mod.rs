//! Static analysis of generated API clients, user source and MSW setup.

pub mod display;
pub mod handlers;
pub mod missing;
pub mod services;
mod ts;
pub mod usages;

pub use display::display_results;
pub use handlers::{
    ExistingHandler, ExistingHandlersMap, HandlerDescriptor, HandlerSource, MswSetupProbe,
    collect_existing_handlers,
};
pub use missing::{MissingHandler, missing_handlers};
pub use services::{ServiceInfo, extract_service_infos};
pub use usages::{ServiceUsage, ServicesUsagesMap, find_services_usages};

//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_actions;
mod account_repository;
mod identity_gateway;
mod identity_resolver;
mod project_actions;
mod project_repository;
mod refresh;
mod task_actions;
mod task_repository;

pub use account_actions::AccountActions;
#[cfg(test)]
pub use account_actions::MockAccountActions;
#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountRepository, AccountRepositoryError, InMemoryAccountRepository};
#[cfg(test)]
pub use identity_gateway::MockIdentityGateway;
pub use identity_gateway::{
    BrokeredIdentity, BrokeredSession, FixtureIdentityGateway, IdentityGateway,
    IdentityGatewayError, ParseProviderError, Provider,
};
#[cfg(test)]
pub use identity_resolver::MockIdentityResolver;
pub use identity_resolver::{IdentityResolver, SignedInSession};
#[cfg(test)]
pub use project_actions::MockProjectActions;
pub use project_actions::ProjectActions;
#[cfg(test)]
pub use project_repository::MockProjectRepository;
pub use project_repository::{InMemoryProjectRepository, ProjectRepository, ProjectRepositoryError};
#[cfg(test)]
pub use refresh::MockRefreshPublisher;
pub use refresh::{
    RecordingRefreshPublisher, RefreshPublishError, RefreshPublisher, RefreshScope, RefreshSignal,
};
#[cfg(test)]
pub use task_actions::MockTaskActions;
pub use task_actions::TaskActions;
#[cfg(test)]
pub use task_repository::MockTaskRepository;
pub use task_repository::{InMemoryTaskRepository, TaskRepository, TaskRepositoryError};

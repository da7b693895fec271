pub mod contract;
pub mod deploy;
pub mod network;

pub use self::{
    contract::{ContractFactory, Deployment, Receipt},
    deploy::{ContractDeployer, DeploymentError, deploy},
    network::{Addresses, Network},
};

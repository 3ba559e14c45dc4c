use crate::domain::models::{Area, BlockId, Role, User};
use uuid::Uuid;

/// Fixed demo identity and permission mapping for each role. Logging in
/// never fails: the role is a closed enum and every arm is covered here.
pub struct RoleGrant {
    pub name: &'static str,
    pub department: Option<Area>,
    pub assigned_blocks: &'static [BlockId],
}

pub fn grant_for(role: Role) -> RoleGrant {
    match role {
        Role::Owner => RoleGrant {
            name: "Giulia Ferrero",
            department: None,
            assigned_blocks: &BlockId::ALL,
        },
        Role::Delegate => RoleGrant {
            name: "Marco Bianchi",
            department: Some(Area::Sales),
            assigned_blocks: &[BlockId::Profile, BlockId::Market],
        },
        Role::Advisor => RoleGrant {
            name: "Elena Ricci",
            department: None,
            assigned_blocks: &BlockId::ALL,
        },
        Role::Employee => RoleGrant {
            name: "Luca Moretti",
            department: Some(Area::Operations),
            assigned_blocks: &[BlockId::Execution],
        },
    }
}

pub fn demo_user(role: Role) -> User {
    let grant = grant_for(role);
    User {
        id: Uuid::new_v4(),
        name: grant.name.to_string(),
        role,
        department: grant.department,
        assigned_blocks: grant.assigned_blocks.to_vec(),
    }
}

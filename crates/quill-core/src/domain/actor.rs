use uuid::Uuid;

use super::{Blog, Role};

/// The authenticated caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether this caller may act on posts owned by `author`.
    pub fn can_act_for(&self, author: Uuid) -> bool {
        self.is_admin() || self.id == author
    }

    /// Whether this caller may read-for-edit, update or delete `blog`.
    pub fn can_modify(&self, blog: &Blog) -> bool {
        self.can_act_for(blog.author)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_can_act_for_anyone() {
        let admin = Actor::new(Uuid::new_v4(), Role::Admin);
        assert!(admin.can_act_for(Uuid::new_v4()));
    }

    #[test]
    fn test_user_can_only_act_for_self() {
        let id = Uuid::new_v4();
        let user = Actor::new(id, Role::User);
        assert!(user.can_act_for(id));
        assert!(!user.can_act_for(Uuid::new_v4()));
    }
}

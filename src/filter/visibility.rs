//! Role-scoped visibility: which rows a caller may see and which attributes
//! are projected into the response.

use crate::auth::{Principal, Role};
use crate::database::models::{MediaView, Room, RoomView};

/// Two-variant capability describing what the caller is allowed to see.
/// Anonymous callers and plain users share the public view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Admin,
    Public,
}

impl Audience {
    pub fn for_principal(principal: Option<&Principal>) -> Self {
        match principal {
            Some(p) if p.role == Role::Admin => Audience::Admin,
            _ => Audience::Public,
        }
    }

    /// Admin sees unavailable rooms; everyone else has the availability
    /// restriction applied before pagination.
    pub fn sees_unavailable(self) -> bool {
        self == Audience::Admin
    }

    /// Project a room into the attribute set this audience may see. The
    /// restricted fields are absent from the public projection entirely,
    /// not merely null.
    pub fn project(self, room: &Room, media: Vec<MediaView>) -> RoomView {
        let admin = self == Audience::Admin;
        RoomView {
            id: room.id,
            owner_id: room.owner_id,
            name: room.name.clone(),
            address: room.address.clone(),
            description: room.description.clone(),
            bedrooms: room.bedrooms,
            bathrooms: room.bathrooms,
            price: room.price,
            area: room.area,
            kind: room.kind.clone(),
            is_available: admin.then_some(room.is_available),
            created_at: admin.then_some(room.created_at),
            updated_at: admin.then_some(room.updated_at),
            media,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use uuid::Uuid;

    #[test]
    fn anonymous_and_user_map_to_public() {
        assert_eq!(Audience::for_principal(None), Audience::Public);
        let user = Principal {
            id: Uuid::new_v4(),
            role: Role::User,
        };
        assert_eq!(Audience::for_principal(Some(&user)), Audience::Public);
    }

    #[test]
    fn admin_maps_to_admin() {
        let admin = Principal {
            id: Uuid::new_v4(),
            role: Role::Admin,
        };
        assert_eq!(Audience::for_principal(Some(&admin)), Audience::Admin);
    }

    #[test]
    fn public_projection_drops_restricted_fields() {
        let room = crate::testing::room_fixture("Sea View Studio");
        let view = Audience::Public.project(&room, vec![]);
        assert!(view.is_available.is_none());
        assert!(view.created_at.is_none());
        assert!(view.updated_at.is_none());

        let serialized = serde_json::to_value(&view).unwrap();
        assert!(serialized.get("is_available").is_none());
        assert!(serialized.get("created_at").is_none());
        assert!(serialized.get("updated_at").is_none());
        assert_eq!(serialized["type"], "rent");
    }

    #[test]
    fn admin_projection_keeps_everything() {
        let room = crate::testing::room_fixture("Sea View Studio");
        let view = Audience::Admin.project(&room, vec![]);
        assert_eq!(view.is_available, Some(true));
        assert!(view.created_at.is_some());
        assert!(view.updated_at.is_some());
    }
}

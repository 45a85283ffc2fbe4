use super::*;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use shared::error::ApiException;
use tokio::sync::Mutex;

#[derive(Default)]
struct FakeMemberGateway {
    members: Mutex<Vec<Member>>,
    deleted: Mutex<Vec<UserId>>,
    offline: Mutex<bool>,
}

#[async_trait]
impl MemberGateway for FakeMemberGateway {
    async fn list_members(&self) -> Result<Vec<Member>> {
        if *self.offline.lock().await {
            return Err(anyhow!("connection refused"));
        }
        Ok(self.members.lock().await.clone())
    }

    async fn create_member(&self, req: &CreateMemberRequest) -> Result<Member> {
        let mut members = self.members.lock().await;
        if members.iter().any(|m| m.email == req.email) {
            return Err(ApiException::new(ErrorCode::Conflict, "email is already registered").into());
        }
        let member = Member {
            id: UserId::new_random(),
            email: req.email.clone(),
            name: req.name.clone(),
            active: true,
            created_at: Utc::now(),
        };
        members.push(member.clone());
        Ok(member)
    }

    async fn update_member(&self, user_id: UserId, req: &UpdateMemberRequest) -> Result<Member> {
        let mut members = self.members.lock().await;
        let member = members
            .iter_mut()
            .find(|m| m.id == user_id)
            .ok_or_else(|| ApiException::new(ErrorCode::NotFound, "user not found"))?;
        member.name = req.name.clone();
        member.email = req.email.clone();
        if let Some(active) = req.active {
            member.active = active;
        }
        Ok(member.clone())
    }

    async fn delete_member(&self, user_id: UserId) -> Result<()> {
        self.members.lock().await.retain(|m| m.id != user_id);
        self.deleted.lock().await.push(user_id);
        Ok(())
    }
}

fn member(name: &str, email: &str, minutes_ago: i64) -> Member {
    Member {
        id: UserId::new_random(),
        email: email.to_string(),
        name: name.to_string(),
        active: true,
        created_at: Utc::now() - Duration::minutes(minutes_ago),
    }
}

async fn directory_with(members: Vec<Member>) -> (MemberDirectory, Arc<FakeMemberGateway>) {
    let gateway = Arc::new(FakeMemberGateway {
        members: Mutex::new(members),
        ..FakeMemberGateway::default()
    });
    let directory = MemberDirectory::new(gateway.clone(), Notifier::new());
    assert!(matches!(directory.refresh().await, LoadOutcome::Loaded(_)));
    (directory, gateway)
}

#[tokio::test]
async fn lists_newest_first_and_searches() {
    let (directory, _gateway) = directory_with(vec![
        member("Antiga", "antiga@example.com", 60),
        member("Nova", "nova@example.com", 1),
    ])
    .await;

    let names: Vec<_> = directory
        .members()
        .await
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(names, vec!["Nova", "Antiga"]);
    assert_eq!(directory.search("ANTIGA@").await.len(), 1);
    assert_eq!(directory.search("").await.len(), 2);
}

#[tokio::test]
async fn delete_requires_matching_confirmation() {
    let target = member("Rui", "rui@example.com", 5);
    let (directory, gateway) = directory_with(vec![target.clone()]).await;

    assert_eq!(
        directory.delete(target.id, "outro@example.com").await,
        Err(MemberError::ConfirmationMismatch)
    );
    assert!(gateway.deleted.lock().await.is_empty());

    directory
        .delete(target.id, " RUI@example.com ")
        .await
        .expect("delete");
    assert_eq!(gateway.deleted.lock().await.clone(), vec![target.id]);
    assert!(directory.members().await.is_empty());

    assert_eq!(
        directory.delete(target.id, "rui@example.com").await,
        Err(MemberError::NotFound)
    );
}

#[tokio::test]
async fn create_validates_and_maps_conflicts() {
    let (directory, _gateway) =
        directory_with(vec![member("Ana", "ana@example.com", 5)]).await;

    assert!(matches!(
        directory.create("", "x@example.com", "pw").await,
        Err(MemberError::Validation(_))
    ));
    assert!(matches!(
        directory.create("Bea", "sem-arroba", "pw").await,
        Err(MemberError::Validation(_))
    ));
    assert_eq!(
        directory.create("Ana 2", "ana@example.com", "pw").await,
        Err(MemberError::EmailTaken)
    );

    let created = directory
        .create("Bea", "bea@example.com", "pw")
        .await
        .expect("create");
    assert_eq!(directory.members().await[0].id, created.id);
}

#[tokio::test]
async fn update_replaces_cached_member() {
    let target = member("Caio", "caio@example.com", 5);
    let (directory, _gateway) = directory_with(vec![target.clone()]).await;

    let updated = directory
        .update(target.id, "Caio Lima", "caio@example.com", Some(false))
        .await
        .expect("update");
    assert!(!updated.active);
    assert_eq!(directory.members().await, vec![updated]);

    assert_eq!(
        directory
            .update(UserId::new_random(), "X", "x@example.com", None)
            .await,
        Err(MemberError::NotFound)
    );
}

#[tokio::test]
async fn failed_refresh_keeps_list() {
    let (directory, gateway) = directory_with(vec![member("Ana", "ana@example.com", 5)]).await;
    *gateway.offline.lock().await = true;
    assert_eq!(directory.refresh().await, LoadOutcome::Failed);
    assert_eq!(directory.members().await.len(), 1);
}

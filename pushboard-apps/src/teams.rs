//! Team service
//!
//! Teams group an account's child accounts. Only the owning account can see
//! or change a team, and only its own child accounts can be members.

use pushboard_org::{Principal, Team};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::store::{PrincipalDirectory, TeamStore};

const INCORRECT_MEMBERS: &str =
    "Member ids are incorrect. Make sure they are valid and you have the access to them.";
const NOT_TEAM_OWNER: &str = "Authorization error, you can not access this team.";

/// Team operations.
#[derive(Clone)]
pub struct TeamService {
    teams: Arc<dyn TeamStore>,
    directory: Arc<dyn PrincipalDirectory>,
}

impl std::fmt::Debug for TeamService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeamService").finish_non_exhaustive()
    }
}

impl TeamService {
    /// Create the service.
    pub fn new(teams: Arc<dyn TeamStore>, directory: Arc<dyn PrincipalDirectory>) -> Self {
        Self { teams, directory }
    }

    /// Create a team owned by `principal`.
    ///
    /// # Errors
    ///
    /// [`ServiceError::InvalidInput`] if the name is blank or any member is
    /// not a child account of `principal`.
    pub async fn create(&self, principal: &Principal, name: &str, members: Vec<Uuid>) -> ServiceResult<Team> {
        self.check_members(principal, &members).await?;
        let team = Team::new(name, principal, members)?;
        self.teams.save_team(team.clone()).await?;
        info!(team = %team.id, owner = %principal.id, members = team.members.len(), "Team created");
        Ok(team)
    }

    /// Rename a team and replace its members.
    pub async fn update(
        &self,
        principal: &Principal,
        mut team: Team,
        name: &str,
        members: Vec<Uuid>,
    ) -> ServiceResult<Team> {
        Self::validate_owner(&team, principal)?;
        self.check_members(principal, &members).await?;
        team.rename(name)?;
        team.set_members(members);
        self.teams.save_team(team.clone()).await?;
        debug!(team = %team.id, "Team updated");
        Ok(team)
    }

    /// Delete a team.
    pub async fn delete(&self, principal: &Principal, team: Team) -> ServiceResult<Team> {
        Self::validate_owner(&team, principal)?;
        self.teams.delete_team(team.id).await?;
        info!(team = %team.id, "Team deleted");
        Ok(team)
    }

    /// Teams owned by `principal`, sorted by name.
    pub async fn list(&self, principal: &Principal) -> ServiceResult<Vec<Team>> {
        Ok(self.teams.teams_by_owner(principal.id).await?)
    }

    /// Check that `principal` owns `team`.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Forbidden`] for any other account.
    pub fn validate_owner(team: &Team, principal: &Principal) -> ServiceResult<()> {
        if team.is_owned_by(principal) {
            Ok(())
        } else {
            debug!(team = %team.id, principal = %principal.id, "Team access rejected");
            Err(ServiceError::Forbidden(NOT_TEAM_OWNER.to_string()))
        }
    }

    // Every requested id must resolve to a distinct child account of the owner.
    async fn check_members(&self, principal: &Principal, members: &[Uuid]) -> ServiceResult<()> {
        let found = self.directory.children_of(principal.id, members).await?;
        let unique = found.iter().map(|p| p.id).collect::<std::collections::HashSet<_>>();
        if unique.len() != members.len() {
            debug!(
                owner = %principal.id,
                requested = members.len(),
                found = unique.len(),
                "Team member check failed"
            );
            return Err(ServiceError::InvalidInput(INCORRECT_MEMBERS.to_string()));
        }
        Ok(())
    }
}

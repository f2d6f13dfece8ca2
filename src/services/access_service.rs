//! 页面访问门禁服务
//!
//! 管理员无条件放行，其余用户按组织的路由规则判定，
//! 没有规则即拒绝（默认拒绝）。

use crate::{
    auth::ActorContext,
    error::AppError,
    models::access::PageAccess,
    repository::AccessRepository,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// 纯判定核心：管理员放行，规则缺失默认拒绝
pub fn decide(is_admin: bool, rule: Option<bool>) -> bool {
    if is_admin {
        return true;
    }
    rule.unwrap_or(false)
}

pub struct AccessService {
    repo: Arc<AccessRepository>,
}

impl AccessService {
    pub fn new(repo: Arc<AccessRepository>) -> Self {
        Self { repo }
    }

    /// 判定单条路由
    pub async fn check(&self, actor: &ActorContext, route: &str) -> Result<bool, AppError> {
        if actor.is_admin() {
            return Ok(true);
        }

        let rule = self
            .repo
            .find_rule(actor.organisation_id, route)
            .await?
            .map(|r| r.allowed);

        Ok(decide(false, rule))
    }

    /// 批量判定，单条查询失败按拒绝处理而不是让整批失败
    pub async fn check_batch(
        &self,
        actor: &ActorContext,
        routes: &[String],
    ) -> HashMap<String, bool> {
        let mut results = HashMap::with_capacity(routes.len());

        for route in routes {
            let allowed = match self.check(actor, route).await {
                Ok(allowed) => allowed,
                Err(e) => {
                    tracing::warn!(route = %route, error = %e, "Access check failed, denying");
                    false
                }
            };
            results.insert(route.clone(), allowed);
        }

        results
    }

    /// 列出组织的访问规则
    pub async fn list_rules(&self, organisation_id: Uuid) -> Result<Vec<PageAccess>, AppError> {
        self.repo.list_rules(organisation_id).await
    }

    /// 创建或更新访问规则
    pub async fn upsert_rule(
        &self,
        organisation_id: Uuid,
        route: &str,
        allowed: bool,
    ) -> Result<PageAccess, AppError> {
        if route.trim().is_empty() {
            return Err(AppError::validation("Route must not be empty"));
        }

        self.repo.upsert_rule(organisation_id, route, allowed).await
    }

    /// 删除访问规则
    pub async fn delete_rule(&self, organisation_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete_rule(organisation_id, id).await? {
            return Err(AppError::not_found("Access rule not found"));
        }
        Ok(())
    }
}

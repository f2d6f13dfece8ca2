//! 资产生命周期状态机
//!
//! 纯函数核心：根据当前状态和动作计算转换计划，
//! 不做任何 IO，由 AssetService 在事务内执行计划。

use crate::{
    error::AppError,
    models::{asset::AssetStatus, history::HistoryAction},
};

/// 生命周期动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    CheckOut,
    CheckIn,
    MarkAsBroken,
    SendForRepair,
    CompleteRepair { return_status: AssetStatus },
    SetStatus { target: AssetStatus },
}

/// 转换计划：执行层据此更新状态、清理借出字段并写入历史
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPlan {
    pub new_status: AssetStatus,
    pub clear_assignment: bool,
    pub history_action: HistoryAction,
}

/// 计算状态转换计划
///
/// 借出只允许从 available 发起，归还只允许从 in_use 发起；
/// 送修和标记遗失不限进入状态，disposed / lost 会同时释放
/// 资产上的借出信息。
pub fn plan(current: AssetStatus, action: LifecycleAction) -> Result<TransitionPlan, AppError> {
    match action {
        LifecycleAction::CheckOut => {
            if current != AssetStatus::Available {
                return Err(AppError::invalid_transition(format!(
                    "Cannot check out asset in status '{}', must be 'available'",
                    current
                )));
            }
            Ok(TransitionPlan {
                new_status: AssetStatus::InUse,
                clear_assignment: false,
                history_action: HistoryAction::CheckedOut,
            })
        }

        LifecycleAction::CheckIn => {
            if current != AssetStatus::InUse {
                return Err(AppError::invalid_transition(format!(
                    "Cannot check in asset in status '{}', must be 'in_use'",
                    current
                )));
            }
            Ok(TransitionPlan {
                new_status: AssetStatus::Available,
                clear_assignment: true,
                history_action: HistoryAction::CheckedIn,
            })
        }

        // 任意状态可标记遗失/损坏，资产转入 lost 并释放借出信息
        LifecycleAction::MarkAsBroken => Ok(TransitionPlan {
            new_status: AssetStatus::Lost,
            clear_assignment: true,
            history_action: HistoryAction::MarkedAsBroken,
        }),

        // 送修同样不限进入状态，报废/遗失的资产也可以回厂维修
        LifecycleAction::SendForRepair => Ok(TransitionPlan {
            new_status: AssetStatus::Maintenance,
            clear_assignment: false,
            history_action: HistoryAction::SentForRepair,
        }),

        LifecycleAction::CompleteRepair { return_status } => {
            if current != AssetStatus::Maintenance {
                return Err(AppError::invalid_transition(format!(
                    "Cannot complete repair for asset in status '{}', must be 'maintenance'",
                    current
                )));
            }
            if return_status == AssetStatus::Maintenance {
                return Err(AppError::invalid_transition(
                    "Repair completion cannot return asset to 'maintenance'".to_string(),
                ));
            }
            Ok(TransitionPlan {
                new_status: return_status,
                clear_assignment: return_status.releases_assignment(),
                history_action: HistoryAction::StatusChanged,
            })
        }

        LifecycleAction::SetStatus { target } => {
            if target == current {
                return Err(AppError::invalid_transition(format!(
                    "Asset is already in status '{}'",
                    target
                )));
            }
            // in_use 必须经由借出流程进入，直接设置会丢失借出信息
            if target == AssetStatus::InUse {
                return Err(AppError::invalid_transition(
                    "Status 'in_use' can only be reached by checking the asset out".to_string(),
                ));
            }
            Ok(TransitionPlan {
                new_status: target,
                clear_assignment: target.releases_assignment() || current == AssetStatus::InUse,
                history_action: HistoryAction::StatusChanged,
            })
        }
    }
}

//! Creating, listing, editing and deleting savings goals.

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod goals_page;

pub use core::{
    GoalFields, SavingsGoal, create_savings_goal, create_savings_goal_table,
    delete_savings_goal, get_savings_goal, get_savings_goals_for_user, update_savings_goal,
};
pub use create_endpoint::create_goal_endpoint;
pub use create_page::get_new_goal_page;
pub use delete_endpoint::delete_goal_endpoint;
pub use edit_endpoint::update_goal_endpoint;
pub use edit_page::get_edit_goal_page;
pub use goals_page::get_goals_page;

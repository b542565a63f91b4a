pub mod countdown;
pub mod form_view;
pub mod menu;
pub mod question_view;
pub mod scoreboard;

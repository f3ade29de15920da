pub mod mint_panel;
pub mod network;
pub mod wallet;

pub mod tick_worker;

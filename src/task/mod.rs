pub mod daily_wod_publisher;

mod rumqtt_publisher;

pub use rumqtt_publisher::RumqttPublisher;

pub(crate) mod control_loop;
pub(crate) mod indicator;
pub(crate) mod sensor_input;

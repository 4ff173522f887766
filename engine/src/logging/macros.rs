/// Scoped logging: the event is emitted only when the active
/// [`LogConfig`](crate::logging::LogConfig)
/// allows `$level` for `$scope`.
#[macro_export]
macro_rules! scoped_log {
    ($level:ident, $scope:expr, $($arg:tt)*) => {{
        let log_config = $crate::logging::get_log_config();
        if log_config.should_log($scope, $crate::logging::Level::$level) {
            $crate::logging::event!($crate::logging::Level::$level, scope = $scope, $($arg)*);
        }
    }};
}

#[macro_export]
macro_rules! tour_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "tour", $($arg)*)
    };
}

#[macro_export]
macro_rules! locomotion_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "locomotion", $($arg)*)
    };
}

#[macro_export]
macro_rules! input_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "input", $($arg)*)
    };
}

#[macro_export]
macro_rules! physics_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "physics", $($arg)*)
    };
}

#[macro_export]
macro_rules! gadget_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "gadget", $($arg)*)
    };
}

#[macro_export]
macro_rules! camera_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "camera", $($arg)*)
    };
}

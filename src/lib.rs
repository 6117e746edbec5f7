// chat_guardian - a moderation decision engine for real-time chat streams.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - the binary (`main.rs`) = composition root that wires the engine to an
//   `ActionExecutor` and replays a scripted scenario
//
// The engine decides; a platform-integration layer (Discord, Matrix, IRC, ...)
// executes. Nothing in `core/` imports a platform SDK.

// This attr points the module declaration at a more descriptive root file
// so we don't end up with a mod.rs that tells the reader nothing.
#[path = "core/core_layer.rs"]
pub mod core;

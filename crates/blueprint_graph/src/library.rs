// SPDX-License-Identifier: MIT OR Apache-2.0
//! Built-in gameplay node library (Blueprint-like visual scripting).
//!
//! Supports execution flow and data flow.

use crate::node::{NodeCatalog, NodeDefinition, NodeKind};
use crate::props::PropShape;
use crate::socket::{Socket, SocketType};

fn exec_in() -> Socket {
    Socket::input("exec_in", "Exec", SocketType::Exec)
}

fn exec_out() -> Socket {
    Socket::output("exec_out", "Exec", SocketType::Exec)
}

fn binary_math(node_type: &str, description: &str) -> NodeDefinition {
    NodeDefinition::new(node_type, node_type, "Math", NodeKind::Data)
        .with_description(description)
        .with_input(Socket::input("a_in", "A", SocketType::Float))
        .with_input(Socket::input("b_in", "B", SocketType::Float))
        .with_output(Socket::output("result_out", "Result", SocketType::Float))
}

/// Create the gameplay node catalog
pub fn create_gameplay_catalog() -> NodeCatalog {
    let mut catalog = NodeCatalog::new();

    // ========================================================================
    // Events
    // ========================================================================

    catalog.register(
        NodeDefinition::new("Start", "Start", "Events", NodeKind::Event)
            .with_description("Called when script starts")
            .with_icon("play")
            .with_output(exec_out()),
    );

    catalog.register(
        NodeDefinition::new("OnUpdate", "On Update", "Events", NodeKind::Event)
            .with_description("Called every frame")
            .with_icon("refresh")
            .with_output(exec_out())
            .with_output(Socket::output("delta_out", "Delta Time", SocketType::Float)),
    );

    catalog.register(
        NodeDefinition::new("OnTriggerEnter", "On Trigger Enter", "Events", NodeKind::Event)
            .with_description("Called when another collider enters the trigger")
            .with_output(exec_out())
            .with_output(Socket::output("other_out", "Other", SocketType::Object)),
    );

    // ========================================================================
    // Flow control
    // ========================================================================

    catalog.register(
        NodeDefinition::new("Branch", "Branch", "Flow", NodeKind::Exec)
            .with_description("Conditional execution based on boolean value")
            .with_input(exec_in())
            .with_input(Socket::input("condition_in", "Condition", SocketType::Bool))
            .with_output(Socket::output("true_out", "True", SocketType::Exec))
            .with_output(Socket::output("false_out", "False", SocketType::Exec)),
    );

    catalog.register(
        NodeDefinition::new("Sequence", "Sequence", "Flow", NodeKind::Exec)
            .with_description("Execute multiple outputs in sequence")
            .with_input(exec_in())
            .with_output(Socket::output("then0_out", "Then 0", SocketType::Exec))
            .with_output(Socket::output("then1_out", "Then 1", SocketType::Exec))
            .with_output(Socket::output("then2_out", "Then 2", SocketType::Exec)),
    );

    catalog.register(
        NodeDefinition::new("Delay", "Delay", "Flow", NodeKind::Exec)
            .with_description("Wait for specified seconds")
            .with_input(exec_in())
            .with_input(Socket::input("duration_in", "Duration", SocketType::Float))
            .with_output(Socket::output("completed_out", "Completed", SocketType::Exec))
            .with_props(PropShape::Duration),
    );

    // ========================================================================
    // Math
    // ========================================================================

    catalog.register(binary_math("Add", "Add two numbers"));
    catalog.register(binary_math("Subtract", "Subtract two numbers"));
    catalog.register(binary_math("Multiply", "Multiply two numbers"));
    catalog.register(binary_math("Divide", "Divide two numbers"));

    // ========================================================================
    // Logic
    // ========================================================================

    catalog.register(
        NodeDefinition::new("Clamp", "Clamp", "Logic", NodeKind::Data)
            .with_description("Clamp a value between min and max")
            .with_input(Socket::input("value_in", "Value", SocketType::Float))
            .with_input(Socket::input("min_in", "Min", SocketType::Float))
            .with_input(Socket::input("max_in", "Max", SocketType::Float))
            .with_output(Socket::output("result_out", "Result", SocketType::Float)),
    );

    catalog.register(
        NodeDefinition::new("Lerp", "Lerp", "Logic", NodeKind::Data)
            .with_description("Linear interpolation between A and B")
            .with_input(Socket::input("a_in", "A", SocketType::Float))
            .with_input(Socket::input("b_in", "B", SocketType::Float))
            .with_input(Socket::input("t_in", "T", SocketType::Float))
            .with_output(Socket::output("result_out", "Result", SocketType::Float)),
    );

    // ========================================================================
    // Debug
    // ========================================================================

    catalog.register(
        NodeDefinition::new("Print", "Print", "Debug", NodeKind::Exec)
            .with_description("Print message to console")
            .with_icon("terminal")
            .with_input(exec_in())
            .with_input(Socket::input("message_in", "Message", SocketType::String))
            .with_output(exec_out())
            .with_props(PropShape::Message),
    );

    // ========================================================================
    // Engine API
    // ========================================================================

    catalog.register(
        NodeDefinition::new("GetPosition", "Get Position", "Unity", NodeKind::Data)
            .with_description("Get GameObject position")
            .with_input(Socket::input("object_in", "Object", SocketType::Object))
            .with_output(Socket::output("position_out", "Position", SocketType::Vector3)),
    );

    catalog.register(
        NodeDefinition::new("SetPosition", "Set Position", "Unity", NodeKind::Exec)
            .with_description("Set GameObject position")
            .with_input(exec_in())
            .with_input(Socket::input("object_in", "Object", SocketType::Object))
            .with_input(Socket::input("position_in", "Position", SocketType::Vector3))
            .with_output(exec_out()),
    );

    catalog.register(
        NodeDefinition::new("PlaySound", "Play Sound", "Unity", NodeKind::Exec)
            .with_description("Play audio clip")
            .with_input(exec_in())
            .with_input(Socket::input("sound_in", "Sound", SocketType::Object))
            .with_output(exec_out()),
    );

    // ========================================================================
    // Variables
    // ========================================================================

    catalog.register(
        NodeDefinition::new("GetVariable", "Get Variable", "Variables", NodeKind::Data)
            .with_description("Read a blueprint variable")
            .with_output(Socket::output("value_out", "Value", SocketType::Float))
            .with_props(PropShape::Variable),
    );

    catalog.register(
        NodeDefinition::new("SetVariable", "Set Variable", "Variables", NodeKind::Exec)
            .with_description("Write a blueprint variable")
            .with_input(exec_in())
            .with_input(Socket::input("value_in", "Value", SocketType::Float))
            .with_output(exec_out())
            .with_props(PropShape::Variable),
    );

    // ========================================================================
    // Constants
    // ========================================================================

    catalog.register(
        NodeDefinition::new("FloatConstant", "Float", "Constants", NodeKind::Data)
            .with_description("Float constant value")
            .with_output(Socket::output("value_out", "Value", SocketType::Float))
            .with_props(PropShape::FloatValue),
    );

    catalog.register(
        NodeDefinition::new("StringConstant", "String", "Constants", NodeKind::Data)
            .with_description("String constant value")
            .with_output(Socket::output("value_out", "Value", SocketType::String))
            .with_props(PropShape::StringValue),
    );

    catalog.register(
        NodeDefinition::new("BoolConstant", "Bool", "Constants", NodeKind::Data)
            .with_description("Boolean constant value")
            .with_output(Socket::output("value_out", "Value", SocketType::Bool))
            .with_props(PropShape::BoolValue),
    );

    catalog.register(
        NodeDefinition::new("Vector3Constant", "Vector3", "Constants", NodeKind::Data)
            .with_description("Vector3 constant value")
            .with_output(Socket::output("value_out", "Value", SocketType::Vector3))
            .with_props(PropShape::Vector3Value),
    );

    catalog
}

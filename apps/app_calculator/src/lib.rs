use wit_bindgen::generate;

generate!({
    world: "calculator",
    path: "../../wit",
});

use calc::demo::add::add;
use calc::demo::sub::sub;
use exports::calc::demo::calculate::{Guest, Op};

struct Component;

impl Guest for Component {
    fn eval_expression(op: Op, x: u32, y: u32) -> u32 {
        match op {
            Op::Add => add(x, y),
            // The subtractor is signed; reinterpret across the boundary.
            Op::Sub => sub(x as i32, y as i32) as u32,
        }
    }
}

export!(Component);

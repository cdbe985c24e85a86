//! 注册器：把组件树展开成扁平的注册记录

use di_abstractions::{Element, ElementOptions, Elements, Registration};
use infrastructure_common::{join_path, ComponentOptions, TypeError};
use tracing::debug;

/// 深度优先展开组件树
///
/// `base` 是容器默认选项与本次注册选项合并后的结果。分组选项由外向内逐层覆盖，
/// 组件自身显式设置的选项优先级最高。返回顺序即注册顺序，重复路径以后出现的为准。
/// 任何一个元素非法时整批注册失败。
pub fn flatten(root: &Elements, base: &ComponentOptions) -> Result<Vec<Registration>, TypeError> {
    let mut registrations = Vec::new();
    walk(root, None, base, &mut registrations)?;
    Ok(registrations)
}

fn walk(
    elements: &Elements,
    parent: Option<&str>,
    inherited: &ComponentOptions,
    registrations: &mut Vec<Registration>,
) -> Result<(), TypeError> {
    for (name, element) in elements.iter() {
        if name.is_empty() {
            return Err(TypeError::new(
                "Container::register",
                parent.unwrap_or("elements"),
                "非空的元素名称",
                "\"\"",
            ));
        }

        match element {
            Element::Component(component) => {
                let effective = inherited.merge(component.options());
                registrations.push(Registration::from_component(name, parent, component, &effective)?);
            }
            Element::Group(group) => {
                let path = join_path(parent, name);
                if group.elements().is_empty() {
                    debug!(group = %path, "空分组，不产生注册记录");
                }
                walk(group.elements(), Some(&path), &inherited.merge(group.options()), registrations)?;
            }
        }
    }
    Ok(())
}
